//! Reference collision driver.
//!
//! The [`CollisionWorld`] owns a table of bodies (shape + two monitors each)
//! and runs the per-tick collision cycle. Each [`CollisionWorld::step`]:
//!
//! 1. **Prune**: every monitor drops contacts with despawned bodies, its
//!    contents are copied into the body's `last_colliding` monitor, and it is
//!    cleared.
//! 2. **Detect**: all live, collidable body pairs are tested in ascending
//!    [`BodyId`] order. A pair is skipped unless
//!    [`CollisionWorld::can_collide_with`] accepts it. An overlapping pair
//!    `(a, b)` with contact normal `n` adds `(b, n)` to `a`'s monitor and
//!    `(a, -n)` to `b`'s.
//! 3. **Publish**: monitors become queryable and, if enabled,
//!    [`ContactEvent`]s are emitted for contacts that are new in a view.
//!
//! The phases never interleave, so gameplay code reading a monitor after
//! `step` returns sees the complete contact set for that tick.
//!
//! # Example
//!
//! ```
//! use hitbox_world::prelude::*;
//!
//! let mut world = CollisionWorld::default();
//! let player = world.spawn(Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
//! let ground = world.spawn(Rect::new(-10.0, 1.9, 20.0, 5.0)).unwrap();
//!
//! world.step();
//!
//! let below = world.monitor(player).unwrap().bottom();
//! assert_eq!(below, Some(vec![ground]));
//! ```

use std::fmt;
use std::sync::Arc;

use hitbox_geom::contact::contact_normal;
use hitbox_geom::shape::Shape;
use hitbox_geom::vector::Vec2;

use crate::body::{BodyAllocator, BodyId};
use crate::config::CollisionConfig;
use crate::monitor::{CollisionMonitor, Direction};
use crate::WorldError;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// An overlapping pair found during a step. `body_a < body_b`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPair {
    /// Lower body handle.
    pub body_a: BodyId,
    /// Higher body handle.
    pub body_b: BodyId,
    /// Contact normal from `body_a` toward `body_b`.
    pub normal: Vec2,
}

/// A contact that appeared in one of a body's views this tick but was absent
/// from the same view last tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    /// Tick the contact started on.
    pub tick: u64,
    /// The body whose monitor changed.
    pub body: BodyId,
    /// The body it touched.
    pub other: BodyId,
    /// The view the contact is new in; `None` for the general view.
    pub view: Option<Direction>,
    /// Contact normal from `body` toward `other`.
    pub normal: Vec2,
}

/// Result of one [`CollisionWorld::step`].
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// The tick that was just completed (first step is tick 1).
    pub tick: u64,
    /// Overlapping pairs, ordered by `(body_a, body_b)`.
    pub pairs: Vec<ContactPair>,
    /// New contacts per view (empty if events are disabled).
    pub events: Vec<ContactEvent>,
}

// ---------------------------------------------------------------------------
// Collide rules
// ---------------------------------------------------------------------------

/// A per-body predicate over the other body of a candidate pair. Returning
/// `false` vetoes the contact for both bodies.
#[derive(Clone)]
pub struct CollideRule(Arc<dyn Fn(BodyId) -> bool + Send + Sync>);

impl CollideRule {
    /// Wrap a predicate.
    pub fn new(rule: impl Fn(BodyId) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(rule))
    }

    /// Whether the owning body may collide with `other`.
    pub fn allows(&self, other: BodyId) -> bool {
        (self.0)(other)
    }
}

impl fmt::Debug for CollideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CollideRule(..)")
    }
}

// ---------------------------------------------------------------------------
// CollisionWorld
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct BodySlot {
    id: BodyId,
    shape: Shape,
    can_collide: bool,
    collide_rule: Option<CollideRule>,
    colliding: CollisionMonitor,
    last_colliding: CollisionMonitor,
}

impl BodySlot {
    fn accepts(&self, other: BodyId) -> bool {
        self.can_collide && self.collide_rule.as_ref().map_or(true, |r| r.allows(other))
    }
}

/// A table of collidable bodies plus the tick-scoped contact cycle.
#[derive(Debug)]
pub struct CollisionWorld {
    config: CollisionConfig,
    allocator: BodyAllocator,
    /// Indexed by [`BodyId::index`]; `None` for free slots.
    slots: Vec<Option<BodySlot>>,
    tick: u64,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self {
            config: CollisionConfig::default(),
            allocator: BodyAllocator::new(),
            slots: Vec::new(),
            tick: 0,
        }
    }
}

impl CollisionWorld {
    /// Create a world with a validated configuration.
    pub fn new(config: CollisionConfig) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Whether `id` names a live body.
    pub fn is_alive(&self, id: BodyId) -> bool {
        self.allocator.is_alive(id)
    }

    // -- body table -----------------------------------------------------------

    /// Add a body. Fails if the shape has non-finite fields.
    pub fn spawn(&mut self, shape: impl Into<Shape>) -> Result<BodyId, WorldError> {
        let shape = shape.into();
        shape.validate()?;

        let id = self.allocator.allocate();
        let idx = id.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        let threshold = self.config.direction_threshold;
        self.slots[idx] = Some(BodySlot {
            id,
            shape,
            can_collide: true,
            collide_rule: None,
            colliding: CollisionMonitor::with_threshold(threshold),
            last_colliding: CollisionMonitor::with_threshold(threshold),
        });
        tracing::debug!(body = %id, ?shape, "spawned body");
        Ok(id)
    }

    /// Spawn a copy of `id` (same shape, collide flag and rule) that also
    /// inherits its current and previous contacts.
    pub fn duplicate(&mut self, id: BodyId) -> Result<BodyId, WorldError> {
        let (shape, can_collide, collide_rule) = {
            let slot = self.slot(id)?;
            (slot.shape, slot.can_collide, slot.collide_rule.clone())
        };
        let copy = self.spawn(shape)?;

        let (colliding, last_colliding) = {
            let slot = self.slot(id)?;
            (slot.colliding.clone(), slot.last_colliding.clone())
        };
        let target = self.slot_mut(copy)?;
        target.can_collide = can_collide;
        target.collide_rule = collide_rule;
        target.colliding.extract(&colliding);
        target.last_colliding.extract(&last_colliding);
        Ok(copy)
    }

    /// Remove a body. Returns `false` for a stale handle.
    ///
    /// Other monitors may still list the body until the next step prunes it.
    pub fn despawn(&mut self, id: BodyId) -> bool {
        if !self.allocator.deallocate(id) {
            tracing::warn!(body = %id, "despawn of stale body handle");
            return false;
        }
        self.slots[id.index() as usize] = None;
        tracing::debug!(body = %id, "despawned body");
        true
    }

    /// The body's current shape.
    pub fn shape(&self, id: BodyId) -> Result<&Shape, WorldError> {
        Ok(&self.slot(id)?.shape)
    }

    /// Replace the body's shape.
    pub fn set_shape(&mut self, id: BodyId, shape: impl Into<Shape>) -> Result<(), WorldError> {
        let shape = shape.into();
        shape.validate()?;
        self.slot_mut(id)?.shape = shape;
        Ok(())
    }

    /// Move the body so its middle is at `middle` and set its rotation
    /// (ignored by circles).
    pub fn set_pose(&mut self, id: BodyId, middle: Vec2, rotation: f64) -> Result<(), WorldError> {
        let slot = self.slot_mut(id)?;
        let mut shape = slot.shape;
        shape.set_pose(middle, rotation);
        shape.validate()?;
        slot.shape = shape;
        Ok(())
    }

    /// Enable or disable collision detection for the body. Disabled bodies
    /// are skipped by [`step`](Self::step) but still answer point and shape
    /// queries.
    pub fn set_can_collide(&mut self, id: BodyId, can_collide: bool) -> Result<(), WorldError> {
        self.slot_mut(id)?.can_collide = can_collide;
        Ok(())
    }

    /// Install a rule the body applies to every candidate partner. A pair is
    /// detected only if both bodies' rules accept each other; bodies without
    /// a rule accept everyone. Point and shape queries ignore rules.
    pub fn set_collide_rule(
        &mut self,
        id: BodyId,
        rule: impl Fn(BodyId) -> bool + Send + Sync + 'static,
    ) -> Result<(), WorldError> {
        self.slot_mut(id)?.collide_rule = Some(CollideRule::new(rule));
        Ok(())
    }

    /// Remove the body's collide rule.
    pub fn clear_collide_rule(&mut self, id: BodyId) -> Result<(), WorldError> {
        self.slot_mut(id)?.collide_rule = None;
        Ok(())
    }

    /// Whether `a` and `b` would record a contact if they overlapped: both
    /// live and collidable, and each one's rule accepts the other.
    pub fn can_collide_with(&self, a: BodyId, b: BodyId) -> bool {
        if a == b {
            return false;
        }
        match (self.slot(a), self.slot(b)) {
            (Ok(sa), Ok(sb)) => sa.accepts(b) && sb.accepts(a),
            _ => false,
        }
    }

    // -- monitors -------------------------------------------------------------

    /// Contacts from the most recent step.
    pub fn monitor(&self, id: BodyId) -> Result<&CollisionMonitor, WorldError> {
        Ok(&self.slot(id)?.colliding)
    }

    /// Contacts from the step before the most recent one.
    pub fn last_monitor(&self, id: BodyId) -> Result<&CollisionMonitor, WorldError> {
        Ok(&self.slot(id)?.last_colliding)
    }

    /// Manually reset a body's current contacts.
    pub fn clear_contacts(&mut self, id: BodyId) -> Result<(), WorldError> {
        self.slot_mut(id)?.colliding.clear();
        Ok(())
    }

    // -- queries --------------------------------------------------------------

    /// Live bodies whose shape strictly contains `(x, y)`, in handle order.
    pub fn query_point(&self, x: f64, y: f64) -> Vec<BodyId> {
        self.live_bodies()
            .filter(|(_, slot)| slot.shape.collide_point(x, y))
            .map(|(id, _)| id)
            .collect()
    }

    /// Live bodies overlapping `probe`, in handle order.
    pub fn query_shape(&self, probe: &Shape) -> Vec<BodyId> {
        self.live_bodies()
            .filter(|(_, slot)| slot.shape.collide_box(probe))
            .map(|(id, _)| id)
            .collect()
    }

    // -- tick -----------------------------------------------------------------

    /// Run one collision tick. See the module docs for the phase order.
    pub fn step(&mut self) -> StepReport {
        self.tick += 1;
        let tick = self.tick;

        self.prune_phase();
        let pairs = self.detect_phase();
        let events = self.publish_phase(tick);

        tracing::trace!(
            tick,
            bodies = self.body_count(),
            pairs = pairs.len(),
            events = events.len(),
            "collision step complete"
        );
        StepReport {
            tick,
            pairs,
            events,
        }
    }

    fn prune_phase(&mut self) {
        let allocator = &self.allocator;
        for slot in self.slots.iter_mut().flatten() {
            slot.colliding.remove_dead(|b| allocator.is_alive(b));
            slot.colliding.copy_into(&mut slot.last_colliding);
            slot.colliding.clear();
        }
    }

    fn detect_phase(&mut self) -> Vec<ContactPair> {
        let ids: Vec<BodyId> = self
            .live_bodies()
            .filter(|(_, slot)| slot.can_collide)
            .map(|(id, _)| id)
            .collect();

        let mut pairs = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                debug_assert!(a < b);
                if !self.can_collide_with(a, b) {
                    continue;
                }
                let (Some(sa), Some(sb)) = (self.live_shape(a), self.live_shape(b)) else {
                    continue;
                };
                let Some(normal) = contact_normal(&sa, &sb) else {
                    continue;
                };
                if let Some(slot) = self.live_slot_mut(a) {
                    slot.colliding.add(b, normal);
                }
                if let Some(slot) = self.live_slot_mut(b) {
                    slot.colliding.add(a, -normal);
                }
                tracing::debug!(body_a = %a, body_b = %b, nx = normal.x, ny = normal.y, "contact");
                pairs.push(ContactPair {
                    body_a: a,
                    body_b: b,
                    normal,
                });
            }
        }
        pairs
    }

    fn publish_phase(&mut self, tick: u64) -> Vec<ContactEvent> {
        for slot in self.slots.iter_mut().flatten() {
            slot.colliding.finish();
        }
        if !self.config.collision_events {
            return Vec::new();
        }

        let mut events = Vec::new();
        for (body, slot) in self.live_bodies() {
            let views = Direction::ALL.into_iter().map(Some).chain([None]);
            for view in views {
                let (now, before) = match view {
                    Some(d) => (slot.colliding.toward(d), slot.last_colliding.toward(d)),
                    None => (slot.colliding.general(), slot.last_colliding.general()),
                };
                let before = before.unwrap_or_default();
                for other in now.into_iter().flatten() {
                    if before.contains(&other) {
                        continue;
                    }
                    if let Some(contact) = slot.colliding.get(other) {
                        events.push(ContactEvent {
                            tick,
                            body,
                            other,
                            view,
                            normal: contact.direction,
                        });
                    }
                }
            }
        }
        events
    }

    // -- internals ------------------------------------------------------------

    /// Live bodies in ascending handle order.
    fn live_bodies(&self) -> impl Iterator<Item = (BodyId, &BodySlot)> + '_ {
        let mut bodies: Vec<(BodyId, &BodySlot)> = self
            .slots
            .iter()
            .flatten()
            .filter(|slot| self.allocator.is_alive(slot.id))
            .map(|slot| (slot.id, slot))
            .collect();
        bodies.sort_by_key(|(id, _)| *id);
        bodies.into_iter()
    }

    fn live_shape(&self, id: BodyId) -> Option<Shape> {
        self.slot(id).ok().map(|s| s.shape)
    }

    fn live_slot_mut(&mut self, id: BodyId) -> Option<&mut BodySlot> {
        self.slot_mut(id).ok()
    }

    fn slot(&self, id: BodyId) -> Result<&BodySlot, WorldError> {
        if !self.allocator.is_alive(id) {
            tracing::warn!(body = %id, "access to stale body handle");
            return Err(WorldError::StaleBody { body: id });
        }
        self.slots
            .get(id.index() as usize)
            .and_then(Option::as_ref)
            .ok_or(WorldError::StaleBody { body: id })
    }

    fn slot_mut(&mut self, id: BodyId) -> Result<&mut BodySlot, WorldError> {
        if !self.allocator.is_alive(id) {
            tracing::warn!(body = %id, "access to stale body handle");
            return Err(WorldError::StaleBody { body: id });
        }
        self.slots
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .ok_or(WorldError::StaleBody { body: id })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
