//! Zobrist-keyed transposition table: power-of-two direct-mapped storage
//! with always-replace eviction, simpler than the teacher's four-way
//! bucketed, generation-aged scheme since this search has no iterative
//! deepening to age generations against.

/// Which side of the search window `score` is trustworthy against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `score` is the position's true minimax value.
    Exact,
    /// `score` is a lower bound (the node failed high against some beta).
    Lower,
    /// `score` is an upper bound (the node failed low against some alpha).
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub zbr: u64,
    pub depth: u8,
    pub score: f64,
    pub bound: Bound,
}

/// Direct-mapped, always-replace transposition table keyed by [`zbr`](crate::position::Position::recompute_zobrist).
/// A slot collision (two positions mapping to the same index) silently
/// evicts the prior occupant — `TableOverflow` in the error model, never
/// surfaced to callers.
pub struct TranspositionTable {
    slots: Vec<Option<Entry>>,
    mask: usize,
}

impl TranspositionTable {
    /// `capacity` is rounded up to the next power of two, with a floor of
    /// 1024 entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1024).next_power_of_two();
        TranspositionTable {
            slots: vec![None; capacity],
            mask: capacity - 1,
        }
    }

    fn index(&self, zbr: u64) -> usize {
        (zbr as usize) & self.mask
    }

    #[must_use]
    pub fn probe(&self, zbr: u64) -> Option<Entry> {
        match self.slots[self.index(zbr)] {
            Some(entry) if entry.zbr == zbr => Some(entry),
            _ => None,
        }
    }

    pub fn store(&mut self, zbr: u64, depth: u8, score: f64, bound: Bound) {
        let idx = self.index(zbr);

        #[cfg(feature = "logging")]
        if let Some(evicted) = self.slots[idx] {
            if evicted.zbr != zbr {
                log::debug!(
                    "tt slot {idx} evicted: {:#018x} replaced by {:#018x}",
                    evicted.zbr,
                    zbr
                );
            }
        }

        self.slots[idx] = Some(Entry { zbr, depth, score, bound });
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
