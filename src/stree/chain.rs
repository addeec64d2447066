//! Runs of small nodes awaiting the large node that ends them

use super::arena::Arena;
use super::types::*;

/// The current run of consecutively allocated small nodes.
///
/// Members sit back to back in the branch table, so the run is fully
/// described by its first offset and its length.
#[derive(Debug, Clone)]
pub struct Chain {
    start: Option<BranchOffset>,
    pending: u32,
    max: u32,
}

impl Chain {
    pub fn new(max: u32) -> Self {
        Self {
            start: None,
            pending: 0,
            max,
        }
    }

    /// Record a freshly committed small node
    pub fn begin_or_continue(&mut self, offset: BranchOffset) {
        match self.start {
            None => self.start = Some(offset),
            Some(start) => debug_assert_eq!(offset, start + self.pending * SMALL_WORDS),
        }
        self.pending += 1;
    }

    /// True once the run has reached its configured length
    pub fn is_full(&self) -> bool {
        self.pending >= self.max
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn contains(&self, offset: BranchOffset) -> bool {
        self.start
            .is_some_and(|start| offset >= start && offset < start + self.pending * SMALL_WORDS)
    }

    /// Finalize every pending node against the large node at `large`.
    /// The node right before it gets distance 1, the one before that 2, ...
    pub fn close(&mut self, arena: &mut Arena, large: BranchOffset) {
        if self.pending == 0 {
            return;
        }
        for distance in 1..=self.pending {
            arena.set_distance(large - distance * SMALL_WORDS, distance);
        }
        self.start = None;
        self.pending = 0;
    }
}
