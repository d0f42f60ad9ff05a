//! Collision world configuration.
//!
//! ```
//! use hitbox_world::config::CollisionConfig;
//!
//! let config = CollisionConfig::from_json_str(r#"{ "collision_events": false }"#).unwrap();
//! assert_eq!(config.direction_threshold, 0.2);
//! assert!(!config.collision_events);
//! ```

use serde::{Deserialize, Serialize};

use crate::monitor::DEFAULT_DIRECTION_THRESHOLD;
use crate::WorldError;

/// Settings for a [`CollisionWorld`](crate::world::CollisionWorld).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Minimum normal component for a contact to count toward a direction.
    /// Must be finite and in `[0, 1)`.
    pub direction_threshold: f64,
    /// Emit a [`ContactEvent`](crate::world::ContactEvent) when a contact first
    /// appears in a direction view.
    pub collision_events: bool,
}

impl Default for CollisionConfig {
    /// Threshold 0.2, events on.
    fn default() -> Self {
        Self {
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
            collision_events: true,
        }
    }
}

impl CollisionConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let config: CollisionConfig =
            serde_json::from_str(json).map_err(|e| WorldError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the threshold range.
    pub fn validate(&self) -> Result<(), WorldError> {
        let t = self.direction_threshold;
        if !(t.is_finite() && (0.0..1.0).contains(&t)) {
            return Err(WorldError::Config(format!(
                "direction_threshold must be finite and in [0, 1), got {t}"
            )));
        }
        Ok(())
    }
}
