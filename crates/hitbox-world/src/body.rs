//! Body handles and allocation.
//!
//! Monitors never hold references to the bodies they touched; they hold
//! [`BodyId`]s. A handle names a table slot plus the generation the slot had
//! when the body was spawned, so once a body is despawned every copy of its
//! handle fails [`BodyAllocator::is_alive`], even after the slot is reused.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// BodyId
// ---------------------------------------------------------------------------

/// Handle to a body in a [`CollisionWorld`](crate::world::CollisionWorld).
///
/// Handles order by slot first. At most one generation of a slot is alive at
/// a time, so sorting live handles gives slot order; the collision step walks
/// pairs in that order, which keeps contact insertion order reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId {
    index: u32,
    generation: u32,
}

impl BodyId {
    /// Handle for `index` at `generation`. Only allocators and tests should
    /// need this; gameplay code receives handles from `spawn`.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Table slot.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// How many times the slot had been freed when this body was spawned.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Prints `slot:generation`, e.g. `3:2`.
impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.generation)
    }
}

// ---------------------------------------------------------------------------
// BodyAllocator
// ---------------------------------------------------------------------------

/// Allocates and recycles [`BodyId`]s with generational tracking.
///
/// Free slots are reused in FIFO order so that a freshly freed slot is not
/// immediately handed out again.
#[derive(Debug, Default)]
pub struct BodyAllocator {
    /// Current generation for each slot.
    generations: Vec<u32>,
    /// Whether the slot currently holds a live body.
    alive: Vec<bool>,
    /// Slots available for reuse.
    free_slots: VecDeque<u32>,
}

impl BodyAllocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle, reusing a freed slot with its bumped generation
    /// when one is available.
    pub fn allocate(&mut self) -> BodyId {
        if let Some(index) = self.free_slots.pop_front() {
            self.alive[index as usize] = true;
            BodyId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            BodyId::new(index, 0)
        }
    }

    /// Free a handle's slot and bump its generation so every outstanding copy
    /// of the handle goes stale.
    ///
    /// Returns `false` if the handle was already dead or stale.
    pub fn deallocate(&mut self, id: BodyId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_slots.push_back(id.index());
        true
    }

    /// Whether `id` names a live body of the current generation.
    pub fn is_alive(&self, id: BodyId) -> bool {
        let idx = id.index() as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == id.generation()
    }

    /// Number of live bodies.
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
