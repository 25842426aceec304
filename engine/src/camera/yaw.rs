//! Heading-Following Yaw
//!
//! Swings the camera around behind the agent as the agent turns. The yaw
//! pivot chases the agent's heading with the same rate-limited
//! interpolation the pitch solver uses, but without limits: the camera may
//! swing all the way around.

use serde::{Deserialize, Serialize};

use crate::math::{correct_angle, interpolate_angle};

/// Tuning for the yaw follower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YawConfig {
    /// Interpolation rate toward the agent heading.
    pub interpolation: f32,
    /// Minimum interpolation rate, so the last few degrees do not crawl.
    pub min_interpolation: f32,
}

impl Default for YawConfig {
    fn default() -> Self {
        Self {
            interpolation: 6.0,
            min_interpolation: 2.0,
        }
    }
}

/// Unclamped yaw smoothing toward the agent heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YawFollower {
    config: YawConfig,
    current_yaw: f32,
}

impl YawFollower {
    /// Create a follower at yaw zero.
    pub fn new(config: YawConfig) -> Self {
        Self {
            config,
            current_yaw: 0.0,
        }
    }

    /// Current yaw angle in degrees, normalized into `(-180, 180]`.
    pub fn current_yaw(&self) -> f32 {
        self.current_yaw
    }

    /// Snap the yaw to an angle without smoothing.
    pub fn snap_to(&mut self, yaw_deg: f32) {
        self.current_yaw = correct_angle(yaw_deg);
    }

    /// Step the yaw toward the target heading for this tick.
    pub fn update(&mut self, target_yaw_deg: f32, dt: f32) -> f32 {
        self.current_yaw = interpolate_angle(
            self.current_yaw,
            target_yaw_deg,
            self.config.interpolation,
            self.config.min_interpolation,
            dt,
        );
        self.current_yaw
    }
}
