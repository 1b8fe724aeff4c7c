//! Pre-allocated per-item outcome slots
//!
//! Slots are created before any worker starts. Each worker writes only its
//! own slot, exactly once, so no lock is needed.

use std::sync::OnceLock;

use contracts::ItemOutcome;

#[derive(Debug)]
pub struct OutcomeSlots {
    slots: Box<[OnceLock<ItemOutcome>]>,
}

impl OutcomeSlots {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record the outcome for `index`
    ///
    /// Returns `false` if the slot was already written or does not exist.
    pub fn fill(&self, index: usize, outcome: ItemOutcome) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.set(outcome).is_ok())
    }

    pub fn get(&self, index: usize) -> Option<&ItemOutcome> {
        self.slots.get(index).and_then(OnceLock::get)
    }

    /// Copy out all outcomes; unwritten slots are `TimedOut`
    pub fn snapshot(&self) -> Vec<ItemOutcome> {
        self.slots
            .iter()
            .map(|slot| slot.get().cloned().unwrap_or(ItemOutcome::TimedOut))
            .collect()
    }
}
