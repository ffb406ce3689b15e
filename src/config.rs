//! Global configuration constants and the serializable world configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Default gravity vector used by [`GravityForce`](crate::GravityForce) (Y-up, m/s²).
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, -9.81];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Default damping applied to linear velocity.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.02;

/// Default damping applied to angular velocity.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.02;

/// Upper bound on fixed ticks executed by a single `PhysicsWorld::step` call.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Wall-clock budget for one tick before a warning is logged.
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 4.0;

/// Tunables for a [`PhysicsWorld`](crate::PhysicsWorld).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub time_step: f32,
    pub max_substeps: u32,
    pub frame_budget_ms: f32,
    pub parallel: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
            parallel: false,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if !self.frame_budget_ms.is_finite() || self.frame_budget_ms < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "frame_budget_ms must be non-negative, got {}",
                self.frame_budget_ms
            )));
        }
        Ok(())
    }
}
