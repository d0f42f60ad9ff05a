//! Per-body collision monitor.
//!
//! A [`CollisionMonitor`] accumulates the contacts a body took part in during
//! one tick: which other body, and the contact normal pointing from the owner
//! toward it. Gameplay code then asks directional questions ("is anything
//! below me?") through [`CollisionMonitor::bottom`] and friends.
//!
//! # Lifecycle
//!
//! ```text
//!  Idle --add--> Accumulating --finish--> Queryable --remove_dead--> Pruned
//!   ^                                                                   |
//!   +------------------------------ clear ------------------------------+
//! ```
//!
//! `add` is accepted in any state and moves the monitor back to
//! `Accumulating`. Queries are answered in every state; the driver only
//! guarantees they are complete once the monitor is `Queryable`.
//!
//! # Query convention
//!
//! Every view returns `None` when nothing matches, never an empty list.

use std::collections::HashMap;

use hitbox_geom::vector::{Vec2, DOWN, LEFT, RIGHT, UP};

use crate::body::BodyId;

/// Minimum normal component for a contact to count toward a direction.
/// Glancing contacts below this do not register as left/right/top/bottom.
pub const DEFAULT_DIRECTION_THRESHOLD: f64 = 0.2;

// ---------------------------------------------------------------------------
// Contact / Direction / MonitorState
// ---------------------------------------------------------------------------

/// One recorded contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The other body.
    pub body: BodyId,
    /// Contact normal from the monitor's owner toward `body`.
    pub direction: Vec2,
}

/// The four named screen-space directions (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// `(-1, 0)`
    Left,
    /// `(1, 0)`
    Right,
    /// `(0, -1)`
    Top,
    /// `(0, 1)`
    Bottom,
}

impl Direction {
    /// All directions, in the order events are reported.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];

    /// Unit vector for this direction.
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Left => LEFT,
            Direction::Right => RIGHT,
            Direction::Top => UP,
            Direction::Bottom => DOWN,
        }
    }
}

/// Where a monitor is in its per-tick lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// No contacts recorded.
    #[default]
    Idle,
    /// Contacts are being added during a physics step.
    Accumulating,
    /// The step finished; views are complete for this tick.
    Queryable,
    /// Dead bodies have been removed.
    Pruned,
}

// ---------------------------------------------------------------------------
// CollisionMonitor
// ---------------------------------------------------------------------------

/// Ordered, per-tick set of contacts keyed by body handle.
///
/// Each body appears at most once: the first `add` for a body in a tick wins
/// and later ones are ignored.
#[derive(Debug, Clone)]
pub struct CollisionMonitor {
    /// Contacts in insertion order.
    contacts: Vec<Contact>,
    /// Body handle -> position in `contacts`.
    index: HashMap<BodyId, usize>,
    /// Minimum dot product for directional views.
    threshold: f64,
    state: MonitorState,
}

impl Default for CollisionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionMonitor {
    /// Create an empty monitor with the default direction threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_DIRECTION_THRESHOLD)
    }

    /// Create an empty monitor with a custom direction threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            contacts: Vec::new(),
            index: HashMap::new(),
            threshold,
            state: MonitorState::Idle,
        }
    }

    /// Record a contact with `body`. Returns `false` (and changes nothing but
    /// the state) if `body` is already present.
    pub fn add(&mut self, body: BodyId, direction: Vec2) -> bool {
        self.state = MonitorState::Accumulating;
        if self.index.contains_key(&body) {
            return false;
        }
        self.index.insert(body, self.contacts.len());
        self.contacts.push(Contact { body, direction });
        true
    }

    /// Mark accumulation for this tick as complete.
    pub fn finish(&mut self) {
        if self.state == MonitorState::Accumulating {
            self.state = MonitorState::Queryable;
        }
    }

    /// Drop every contact whose body `is_alive` reports dead. Returns how many
    /// were removed.
    pub fn remove_dead(&mut self, is_alive: impl Fn(BodyId) -> bool) -> usize {
        let before = self.contacts.len();
        self.contacts.retain(|c| is_alive(c.body));
        let removed = before - self.contacts.len();
        if removed > 0 {
            self.rebuild_index();
            tracing::trace!(removed, remaining = self.contacts.len(), "pruned dead contacts");
        }
        self.state = MonitorState::Pruned;
        removed
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.index.clear();
        self.state = MonitorState::Idle;
    }

    /// Replace this monitor's contacts with a copy of `source`'s. The
    /// threshold is kept.
    pub fn extract(&mut self, source: &CollisionMonitor) {
        self.contacts.clone_from(&source.contacts);
        self.index.clone_from(&source.index);
        self.state = source.state;
    }

    /// Copy this monitor's contacts into `target`, replacing its own.
    pub fn copy_into(&self, target: &mut CollisionMonitor) {
        target.extract(self);
    }

    // -- accessors ----------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Direction threshold used by the views.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Raw contacts in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Number of contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether no contacts are recorded.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Whether `body` is among the contacts.
    pub fn has(&self, body: BodyId) -> bool {
        self.index.contains_key(&body)
    }

    /// The contact recorded for `body`, if any.
    pub fn get(&self, body: BodyId) -> Option<&Contact> {
        self.index.get(&body).map(|&i| &self.contacts[i])
    }

    // -- views --------------------------------------------------------------

    /// Every contacted body.
    pub fn general(&self) -> Option<Vec<BodyId>> {
        self.filter(|_| true)
    }

    /// Bodies to the left.
    pub fn left(&self) -> Option<Vec<BodyId>> {
        self.toward(Direction::Left)
    }

    /// Bodies to the right.
    pub fn right(&self) -> Option<Vec<BodyId>> {
        self.toward(Direction::Right)
    }

    /// Bodies above.
    pub fn top(&self) -> Option<Vec<BodyId>> {
        self.toward(Direction::Top)
    }

    /// Bodies below.
    pub fn bottom(&self) -> Option<Vec<BodyId>> {
        self.toward(Direction::Bottom)
    }

    /// Bodies in a named direction.
    pub fn toward(&self, direction: Direction) -> Option<Vec<BodyId>> {
        self.direction(direction.vector())
    }

    /// Bodies whose contact normal has a component along `dir` strictly above
    /// the threshold.
    pub fn direction(&self, dir: Vec2) -> Option<Vec<BodyId>> {
        let threshold = self.threshold;
        self.filter(|c| c.direction.dot(&dir) > threshold)
    }

    /// Bodies whose contact satisfies `pred`.
    pub fn filter(&self, pred: impl Fn(&Contact) -> bool) -> Option<Vec<BodyId>> {
        let hits: Vec<BodyId> = self
            .contacts
            .iter()
            .filter(|c| pred(c))
            .map(|c| c.body)
            .collect();
        if hits.is_empty() {
            None
        } else {
            Some(hits)
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, c) in self.contacts.iter().enumerate() {
            self.index.insert(c.body, i);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
