//! Hitbox World -- tick-scoped contact bookkeeping on top of [`hitbox_geom`].
//!
//! Bodies are addressed by generational [`BodyId`](body::BodyId) handles.
//! Each body owns a [`CollisionMonitor`](monitor::CollisionMonitor) that
//! collects the contacts it took part in during the current tick, so gameplay
//! code can ask directional questions such as "is something below me?".
//!
//! # Quick Start
//!
//! ```
//! use hitbox_world::prelude::*;
//!
//! let mut world = CollisionWorld::new(CollisionConfig::default()).unwrap();
//! let ball = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
//! let wall = world.spawn(Rect::new(0.5, -5.0, 2.0, 10.0)).unwrap();
//!
//! let report = world.step();
//! assert_eq!(report.pairs.len(), 1);
//!
//! let monitor = world.monitor(ball).unwrap();
//! assert_eq!(monitor.right(), Some(vec![wall]));
//! assert_eq!(monitor.left(), None);
//! ```

#![deny(unsafe_code)]

pub mod body;
pub mod config;
pub mod monitor;
pub mod world;

/// Re-export the geometry crate for convenience.
pub use hitbox_geom;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by collision world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The body does not exist (despawned, recycled, or never spawned).
    #[error("body {body:?} does not exist (stale or never spawned)")]
    StaleBody {
        body: body::BodyId,
    },

    /// A shape with non-finite fields was rejected.
    #[error("invalid shape: {0}")]
    InvalidShape(#[from] hitbox_geom::GeomError),

    /// The configuration failed to parse or validate.
    #[error("invalid collision config: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use hitbox_geom::prelude::*;

    pub use crate::body::{BodyAllocator, BodyId};
    pub use crate::config::CollisionConfig;
    pub use crate::monitor::{
        CollisionMonitor, Contact, Direction, MonitorState, DEFAULT_DIRECTION_THRESHOLD,
    };
    pub use crate::world::{
        CollideRule, CollisionWorld, ContactEvent, ContactPair, StepReport,
    };
    pub use crate::WorldError;
}
