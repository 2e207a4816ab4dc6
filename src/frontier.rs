//! The open set of a search. BFS keeps a FIFO queue of cell indices, Dijkstra and A* a binary
//! min-heap keyed by estimated total cost. [BinaryHeap] has no decrease-key, so a cell whose
//! cost improves is simply pushed again and the outdated entry is skipped when it surfaces.
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use log::trace;

/// A heap entry. Ordered so that the [BinaryHeap] max-heap pops the smallest estimated cost.
#[derive(Clone, Copy, Debug)]
pub struct SmallestCostHolder {
    pub estimated_cost: i32,
    pub cost: i32,
    pub index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Estimated cost only, pop order among equal estimates is left to the heap
        other.estimated_cost.cmp(&self.estimated_cost)
    }
}

#[derive(Clone, Debug)]
pub enum Frontier {
    Fifo(VecDeque<usize>),
    Priority(BinaryHeap<SmallestCostHolder>),
}

impl Frontier {
    pub fn new(priority: bool) -> Frontier {
        if priority {
            Frontier::Priority(BinaryHeap::new())
        } else {
            Frontier::Fifo(VecDeque::new())
        }
    }

    /// Adds a cell. `cost` and `estimated_cost` are ignored by the FIFO variant.
    pub fn push(&mut self, index: usize, cost: i32, estimated_cost: i32) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(index),
            Frontier::Priority(heap) => heap.push(SmallestCostHolder {
                estimated_cost,
                cost,
                index,
            }),
        }
    }

    /// Removes the next cell to expand. For the heap, entries whose cost no longer matches
    /// `g_score` are outdated and discarded. Returns [None] once nothing valid is left.
    pub fn pop(&mut self, g_score: &[i32]) -> Option<usize> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Priority(heap) => {
                while let Some(SmallestCostHolder { cost, index, .. }) = heap.pop() {
                    if cost == g_score[index] {
                        return Some(index);
                    }
                    trace!(
                        "Discarding outdated entry for {} (cost {} > {})",
                        index,
                        cost,
                        g_score[index]
                    );
                }
                None
            }
        }
    }

    /// Number of pending entries, outdated heap entries included.
    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Priority(heap) => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
