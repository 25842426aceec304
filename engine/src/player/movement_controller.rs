//! Locomotion Controller
//!
//! Computes the agent's ground-relative velocity and jump impulse from
//! held-key input and the current ground reading. Movement direction is
//! relative to the agent's heading; steep slopes attenuate both movement
//! and jump speed.
//!
//! The controller never integrates gravity itself. It rewrites the
//! horizontal velocity while grounded and leaves the vertical component to
//! whatever integrates the physics step; airborne agents keep their
//! velocity untouched entirely.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::correct_angle;

use super::ground::GroundContact;

/// Movement speed in units per second.
pub const MOVE_SPEED: f32 = 10.0;

/// Heading rotation speed in degrees per second.
pub const ROTATE_SPEED: f32 = 150.0;

/// Vertical speed applied on a jump, in units per second.
pub const JUMP_SPEED: f32 = 10.0;

/// Downward acceleration in units per second squared. Raise this together
/// with the jump speed to make the agent feel less floaty.
pub const GRAVITY: f32 = 50.0;

/// Maximum walkable ground angle in degrees.
pub const SLOPE_LIMIT: f32 = 60.0;

/// Tuning for the locomotion controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Heading rotation speed in degrees per second.
    pub rotate_speed: f32,
    /// Jump speed in units per second.
    pub jump_speed: f32,
    /// Gravity strength for the surrounding integrator.
    pub gravity: f32,
    /// Maximum walkable slope in degrees.
    pub slope_limit: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rotate_speed: ROTATE_SPEED,
            jump_speed: JUMP_SPEED,
            gravity: GRAVITY,
            slope_limit: SLOPE_LIMIT,
        }
    }
}

/// Slope-aware movement and jumping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocomotionController {
    config: LocomotionConfig,
}

impl LocomotionController {
    /// Create a controller with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with custom tuning.
    pub fn with_config(config: LocomotionConfig) -> Self {
        Self { config }
    }

    /// The controller's tuning.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Maximum walkable slope in degrees.
    pub fn slope_limit(&self) -> f32 {
        self.config.slope_limit
    }

    /// Gravity strength for the surrounding physics integrator.
    pub fn gravity(&self) -> f32 {
        self.config.gravity
    }

    /// New heading after applying held rotation input for this tick.
    ///
    /// `turn_axis` is -1, 0, or 1 (left, none, right). The result is
    /// normalized into `(-180, 180]`.
    pub fn rotate_heading(&self, heading_deg: f32, turn_axis: i32, dt: f32) -> f32 {
        correct_angle(heading_deg + turn_axis as f32 * self.config.rotate_speed * dt)
    }

    /// Heading-relative forward direction on the horizontal plane.
    ///
    /// Heading 0 faces -Z; positive headings turn toward +X.
    pub fn heading_forward(heading_deg: f32) -> Vec3 {
        let rad = heading_deg.to_radians();
        Vec3::new(rad.sin(), 0.0, -rad.cos())
    }

    /// Heading-relative right direction on the horizontal plane.
    pub fn heading_right(heading_deg: f32) -> Vec3 {
        let forward = Self::heading_forward(heading_deg);
        Vec3::new(-forward.z, 0.0, forward.x)
    }

    /// World-space movement direction from held movement keys.
    ///
    /// `forward_axis` covers forward/backward, `strafe_axis` covers the
    /// strafe pair. The result is not normalized; [`compute_velocity`]
    /// normalizes before applying speed.
    ///
    /// [`compute_velocity`]: LocomotionController::compute_velocity
    pub fn move_direction(heading_deg: f32, forward_axis: i32, strafe_axis: i32) -> Vec3 {
        Self::heading_forward(heading_deg) * forward_axis as f32
            + Self::heading_right(heading_deg) * strafe_axis as f32
    }

    /// The agent's new velocity for this tick.
    ///
    /// Airborne agents keep `current_velocity` unchanged; gravity and
    /// falling belong to the physics integration, not to input handling.
    /// Grounded agents get the input direction at move speed, attenuated
    /// by the slope while already moving upward, with the vertical
    /// component preserved so jumps and falls are never clobbered.
    pub fn compute_velocity(
        &self,
        current_velocity: Vec3,
        input_dir: Vec3,
        contact: GroundContact,
    ) -> Vec3 {
        if !contact.is_grounded(self.config.slope_limit) {
            return current_velocity;
        }

        let mut speed = self.config.move_speed;
        if current_velocity.y > 0.0 {
            speed *= contact.slope_adjustment(self.config.slope_limit);
        }

        let dir = input_dir.normalize_or_zero() * speed;
        Vec3::new(dir.x, current_velocity.y, dir.z)
    }

    /// Vertical velocity for a jump starting this tick, if one is allowed.
    ///
    /// Only grounded agents jump. The jump speed is slope-attenuated when
    /// the agent is already moving upward (running up a ramp), matching
    /// the movement attenuation.
    pub fn jump_velocity(&self, current_velocity: Vec3, contact: GroundContact) -> Option<f32> {
        if !contact.is_grounded(self.config.slope_limit) {
            return None;
        }
        let mut speed = self.config.jump_speed;
        if current_velocity.y > 0.0 {
            speed *= contact.slope_adjustment(self.config.slope_limit);
        }
        Some(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ground::NO_GROUND;

    fn grounded_flat() -> GroundContact {
        GroundContact { slope_deg: 0.0, contact_count: 0 }
    }

    #[test]
    fn test_airborne_velocity_unchanged() {
        let controller = LocomotionController::new();
        let contact = GroundContact { slope_deg: NO_GROUND, contact_count: 0 };
        let velocity = Vec3::new(3.0, -7.0, 1.0);
        let input = Vec3::new(0.0, 0.0, -1.0);
        assert_eq!(controller.compute_velocity(velocity, input, contact), velocity);
    }

    #[test]
    fn test_grounded_movement_at_full_speed() {
        let controller = LocomotionController::new();
        let velocity =
            controller.compute_velocity(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), grounded_flat());
        assert!((velocity.z + MOVE_SPEED).abs() < 1e-5);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_vertical_velocity_preserved() {
        let controller = LocomotionController::new();
        let current = Vec3::new(0.0, -4.2, 0.0);
        let velocity =
            controller.compute_velocity(current, Vec3::new(1.0, 0.0, 0.0), grounded_flat());
        assert_eq!(velocity.y, -4.2);
        assert!((velocity.x - MOVE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_no_input_stops_horizontal_motion() {
        let controller = LocomotionController::new();
        let current = Vec3::new(8.0, 0.0, 8.0);
        let velocity = controller.compute_velocity(current, Vec3::ZERO, grounded_flat());
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_slope_attenuation_only_while_rising() {
        let controller = LocomotionController::new();
        let contact = GroundContact { slope_deg: 10.0, contact_count: 0 };
        let input = Vec3::new(1.0, 0.0, 0.0);

        // Rising: attenuated by (60 - 10) / 60
        let rising = controller.compute_velocity(Vec3::new(0.0, 2.0, 0.0), input, contact);
        let expected = MOVE_SPEED * (50.0 / 60.0);
        assert!((rising.x - expected).abs() < 1e-4, "got {}", rising.x);

        // Level or falling: full speed
        let level = controller.compute_velocity(Vec3::ZERO, input, contact);
        assert!((level.x - MOVE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_contact_only_grounding_has_no_penalty() {
        let controller = LocomotionController::new();
        let contact = GroundContact { slope_deg: NO_GROUND, contact_count: 1 };
        let rising = controller.compute_velocity(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            contact,
        );
        assert!((rising.x - MOVE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let controller = LocomotionController::new();
        assert_eq!(
            controller.jump_velocity(Vec3::ZERO, grounded_flat()),
            Some(JUMP_SPEED)
        );

        let airborne = GroundContact { slope_deg: NO_GROUND, contact_count: 0 };
        assert_eq!(controller.jump_velocity(Vec3::ZERO, airborne), None);
    }

    #[test]
    fn test_jump_attenuated_on_slope_while_rising() {
        let controller = LocomotionController::new();
        let contact = GroundContact { slope_deg: 30.0, contact_count: 0 };
        let jump = controller
            .jump_velocity(Vec3::new(0.0, 1.0, 0.0), contact)
            .unwrap();
        assert!((jump - JUMP_SPEED * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_heading_directions() {
        // Heading 0 faces -Z
        let forward = LocomotionController::heading_forward(0.0);
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
        let right = LocomotionController::heading_right(0.0);
        assert!((right - Vec3::X).length() < 1e-6);

        // Heading 90 faces +X
        let forward = LocomotionController::heading_forward(90.0);
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_rotate_heading_wraps() {
        let controller = LocomotionController::new();
        let heading = controller.rotate_heading(179.0, 1, 0.016);
        assert!(heading > -180.0 && heading <= 180.0);

        // One second of turning right at default speed
        let heading = controller.rotate_heading(0.0, 1, 1.0);
        assert!((heading - ROTATE_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_diagonal_input_normalized_to_move_speed() {
        let controller = LocomotionController::new();
        let dir = LocomotionController::move_direction(0.0, 1, 1);
        let velocity = controller.compute_velocity(Vec3::ZERO, dir, grounded_flat());
        assert!((velocity.length() - MOVE_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = LocomotionConfig { move_speed: 6.0, ..Default::default() };
        let json = serde_json::to_string(&config).unwrap();
        let back: LocomotionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
