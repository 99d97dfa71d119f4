use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
    hash::Hash,
};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry<T> {
    priority: u32,
    /// Insertion counter, so equal priorities come out first-in first-out
    sequence: u64,
    item: T,
}

/// Min-priority queue keyed by a numeric score, with membership testing.
///
/// Ties are broken by insertion order. An item may be queued more than once;
/// it counts as contained until every copy has been popped.
///
/// [`PriorityQueue::contains`] is for callers that keep no marks of their own. The
/// built-in searches track the same information on the grid through the frontier
/// and visited flags, and never query it.
pub struct PriorityQueue<T> {
    // Using Reverse to turn the max-heap into a min-heap
    heap: BinaryHeap<Reverse<Entry<T>>>,
    members: HashMap<T, usize>,
    next_sequence: u64,
}

impl<T: Copy + Eq + Hash + Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            members: HashMap::new(),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, item: T, priority: u32) {
        self.heap.push(Reverse(Entry {
            priority,
            sequence: self.next_sequence,
            item,
        }));
        self.next_sequence += 1;
        *self.members.entry(item).or_insert(0) += 1;
    }

    /// Removes and returns the item with the lowest priority, along with that priority.
    pub fn pop(&mut self) -> Option<(T, u32)> {
        let Reverse(entry) = self.heap.pop()?;
        if let Some(count) = self.members.get_mut(&entry.item) {
            *count -= 1;
            if *count == 0 {
                self.members.remove(&entry.item);
            }
        }
        Some((entry.item, entry.priority))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.members.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T: Copy + Eq + Hash + Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
