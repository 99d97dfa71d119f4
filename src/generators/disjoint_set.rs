use std::cmp::Ordering;

/// Union-find over integer-indexed elements, with path compression and union by rank.
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Creates `size` singleton sets.
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the root of the set containing `x`, pointing every node on the way
    /// directly at it.
    pub fn find(&mut self, x: usize) -> usize {
        let parent = self.parent[x];
        if parent == x {
            return x;
        }
        let root = self.find(parent);
        self.parent[x] = root;
        root
    }

    /// Merges the sets containing `x` and `y`, hanging the lower-ranked root under
    /// the higher one. Returns `false` if they were already the same set.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (a, b) = (self.find(x), self.find(y));
        if a == b {
            return false;
        }

        let (root, child) = match self.rank[a].cmp(&self.rank[b]) {
            Ordering::Less => (b, a),
            Ordering::Greater | Ordering::Equal => (a, b),
        };
        self.parent[child] = root;
        if self.rank[root] == self.rank[child] {
            self.rank[root] += 1;
        }
        true
    }

    pub fn same_set(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}
