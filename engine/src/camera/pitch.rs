//! Terrain-Aware Pitch
//!
//! Tilts the follow camera up or down based on the terrain ahead of the
//! agent, so the camera looks up a hill the agent is climbing and down a
//! drop the agent is approaching.
//!
//! Each tick the solver samples the ground height at several distances in
//! front of the agent. For each distance it first searches for a forward
//! ray that is not blocked by terrain (biasing the ray down, then
//! incrementally up), then casts straight down from that ray's endpoint to
//! find the ground. The sample whose angle is closest to the default pitch
//! wins, which keeps a single odd reading (a pebble, a gap) from yanking
//! the camera around. The chosen angle is clamped to the pitch limits and
//! approached with rate-limited interpolation.
//!
//! Positive pitch angles look down, negative look up.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::interpolate_angle;
use crate::physics::{RayProbe, SurfaceMask};

/// Tuning for the pitch solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Interpolation rate toward the desired pitch.
    pub interpolation: f32,
    /// Minimum interpolation rate, so the last few degrees do not crawl.
    pub min_interpolation: f32,
    /// Pitch when the terrain does not dictate a higher or lower angle.
    pub default_pitch: f32,
    /// How far up the camera may pitch, in degrees. Can be lowered (even
    /// below zero) by a camera hint.
    pub max_pitch_up: f32,
    /// How far down the camera may pitch, in degrees.
    pub max_pitch_down: f32,
    /// Distance ahead of the agent where terrain sampling starts. Terrain
    /// right at the agent's feet should not steer the pitch.
    pub terrain_check_start: f32,
    /// Distance ahead of the agent where terrain sampling stops.
    pub terrain_check_end: f32,
    /// Sampling step. Keep at 1.0 or less so thin terrain is not skipped.
    pub terrain_check_increment: f32,
    /// Depth of the downward ground ray from each sample point.
    pub down_ray_distance: f32,
    /// Steepness of the up/down bias used to find a clear forward ray.
    /// 0.5 is a 1:2 slope; 1.0 would be 45 degrees.
    pub max_ray_bias: f32,
    /// Layers that count as terrain.
    pub mask: SurfaceMask,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            interpolation: 4.0,
            min_interpolation: 2.0,
            default_pitch: 15.0,
            max_pitch_up: 85.0,
            max_pitch_down: 20.0,
            terrain_check_start: 4.0,
            terrain_check_end: 10.0,
            terrain_check_increment: 0.5,
            down_ray_distance: 50.0,
            max_ray_bias: 0.5,
            mask: SurfaceMask::ALL,
        }
    }
}

/// Terrain-following pitch with clamped, rate-limited smoothing.
#[derive(Debug, Clone)]
pub struct PitchSolver {
    config: PitchConfig,
    current_pitch: f32,
}

impl PitchSolver {
    /// Create a solver starting at the default pitch.
    pub fn new(config: PitchConfig) -> Self {
        Self {
            current_pitch: config.default_pitch,
            config,
        }
    }

    /// The solver's tuning.
    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    /// Current pitch angle in degrees.
    pub fn current_pitch(&self) -> f32 {
        self.current_pitch
    }

    /// Pitch used when the terrain gives no signal. Hint-overridable.
    pub fn default_pitch(&self) -> f32 {
        self.config.default_pitch
    }

    /// Override the default pitch.
    pub fn set_default_pitch(&mut self, pitch: f32) {
        self.config.default_pitch = pitch;
    }

    /// Upward pitch limit. Hint-overridable.
    pub fn max_pitch_up(&self) -> f32 {
        self.config.max_pitch_up
    }

    /// Override the upward pitch limit.
    pub fn set_max_pitch_up(&mut self, limit: f32) {
        self.config.max_pitch_up = limit;
    }

    /// Downward pitch limit. Hint-overridable.
    pub fn max_pitch_down(&self) -> f32 {
        self.config.max_pitch_down
    }

    /// Override the downward pitch limit.
    pub fn set_max_pitch_down(&mut self, limit: f32) {
        self.config.max_pitch_down = limit;
    }

    /// Sample the terrain ahead and advance the pitch one tick.
    ///
    /// `forward` and `up` are the agent's (normalized) axes; `agent_pos`
    /// is the model position the rays originate from.
    pub fn update<P: RayProbe>(
        &mut self,
        agent_pos: Vec3,
        forward: Vec3,
        up: Vec3,
        dt: f32,
        probe: &P,
    ) -> f32 {
        let desired = self.desired_pitch(agent_pos, forward, up, probe);
        self.interpolate(desired, dt)
    }

    /// The terrain-derived pitch target, before clamping and smoothing.
    ///
    /// Scans from `terrain_check_start` to `terrain_check_end` and keeps
    /// the sample closest to the default pitch.
    pub fn desired_pitch<P: RayProbe>(
        &self,
        agent_pos: Vec3,
        forward: Vec3,
        up: Vec3,
        probe: &P,
    ) -> f32 {
        let cfg = &self.config;
        let mut desired = 360.0;
        let mut distance = cfg.terrain_check_start;
        while distance <= cfg.terrain_check_end {
            let angle = self.pitch_check(agent_pos, forward, up, distance, probe);
            if (angle - cfg.default_pitch).abs() < (desired - cfg.default_pitch).abs() {
                desired = angle;
            }
            distance += cfg.terrain_check_increment;
        }
        desired
    }

    /// Clamp a pitch target to the limits and step the pitch toward it.
    fn interpolate(&mut self, desired: f32, dt: f32) -> f32 {
        let cfg = &self.config;
        let desired = desired.clamp(-cfg.max_pitch_up, cfg.max_pitch_down);
        self.current_pitch = interpolate_angle(
            self.current_pitch,
            desired,
            cfg.interpolation,
            cfg.min_interpolation,
            dt,
        );
        self.current_pitch
    }

    /// Angle from the agent to the terrain at one forward distance.
    ///
    /// Falls back to the default pitch when no clear forward ray exists at
    /// this distance, and treats a bottomless down-cast as ground at the
    /// full ray depth.
    fn pitch_check<P: RayProbe>(
        &self,
        agent_pos: Vec3,
        forward: Vec3,
        up: Vec3,
        distance: f32,
        probe: &P,
    ) -> f32 {
        let cfg = &self.config;
        let Some(clear_dir) = self.clear_forward(agent_pos, forward, up, distance, probe) else {
            return cfg.default_pitch;
        };

        // Look down from the end of the clear forward ray
        let down_point = agent_pos + clear_dir * distance;
        let drop = match probe.cast_nearest(down_point, -up, cfg.down_ray_distance, cfg.mask) {
            Some(hit) => hit.distance,
            None => cfg.down_ray_distance,
        };

        let ground_height = clear_dir.y * distance - drop;
        let mut horizontal = clear_dir;
        horizontal.y = 0.0;
        let ground_distance = (horizontal * distance).length();
        -ground_height.atan2(ground_distance).to_degrees()
    }

    /// Find a forward direction not blocked by terrain, trying the most
    /// downward bias first and tilting up step by step.
    fn clear_forward<P: RayProbe>(
        &self,
        agent_pos: Vec3,
        forward: Vec3,
        up: Vec3,
        distance: f32,
        probe: &P,
    ) -> Option<Vec3> {
        let cfg = &self.config;
        for step in 0..5 {
            let bias = -1.0 + step as f32 * 0.5;
            let dir = (forward + up * (cfg.max_ray_bias * bias)).normalize();
            if probe.cast_all(agent_pos, dir, distance, cfg.mask).is_empty() {
                return Some(dir);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{AabbScene, SceneBox, SurfaceTag};

    fn ground_scene(ground_y: f32) -> AabbScene {
        let mut scene = AabbScene::new();
        scene.add(SceneBox::from_center(
            Vec3::new(0.0, ground_y - 0.5, 0.0),
            Vec3::new(500.0, 0.5, 500.0),
            0,
            SurfaceTag::Normal,
        ));
        scene
    }

    #[test]
    fn test_flat_ground_pitches_down_toward_it() {
        // Agent 1 unit above flat ground: every sample sees ground below,
        // so the desired pitch is positive (looking down)
        let scene = ground_scene(0.0);
        let solver = PitchSolver::new(PitchConfig::default());
        let desired =
            solver.desired_pitch(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, Vec3::Y, &scene);
        assert!(desired > 0.0, "flat ground below gave pitch {desired}");
        assert!(desired < 90.0);
    }

    #[test]
    fn test_all_blocked_scan_returns_default_pitch() {
        // Agent boxed in: every forward bias is blocked at every distance
        let mut scene = AabbScene::new();
        scene.add(SceneBox::from_center(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::splat(2.0),
            0,
            SurfaceTag::Normal,
        ));

        let solver = PitchSolver::new(PitchConfig::default());
        let desired =
            solver.desired_pitch(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, Vec3::Y, &scene);
        assert_eq!(desired, solver.default_pitch());
    }

    #[test]
    fn test_cliff_ahead_pitches_further_down() {
        // No ground at all ahead: down-casts bottom out at full depth,
        // which reads as a deep drop
        let scene = AabbScene::new();
        let solver = PitchSolver::new(PitchConfig::default());
        let desired =
            solver.desired_pitch(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, Vec3::Y, &scene);
        assert!(
            desired > solver.default_pitch(),
            "drop ahead gave pitch {desired}, not below default"
        );
    }

    #[test]
    fn test_interpolation_clamps_to_limits() {
        let config = PitchConfig {
            max_pitch_up: 30.0,
            max_pitch_down: 10.0,
            ..Default::default()
        };
        let mut solver = PitchSolver::new(config);
        // Drive toward a far-too-low target for a while
        for _ in 0..600 {
            solver.interpolate(80.0, 0.016);
        }
        assert!(
            solver.current_pitch() <= 10.0 + 1e-3,
            "pitch {} exceeded down limit",
            solver.current_pitch()
        );

        for _ in 0..600 {
            solver.interpolate(-80.0, 0.016);
        }
        assert!(
            solver.current_pitch() >= -30.0 - 1e-3,
            "pitch {} exceeded up limit",
            solver.current_pitch()
        );
    }

    #[test]
    fn test_converges_to_default_when_boxed_in() {
        let mut scene = AabbScene::new();
        scene.add(SceneBox::from_center(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::splat(2.0),
            0,
            SurfaceTag::Normal,
        ));

        let mut solver = PitchSolver::new(PitchConfig::default());
        for _ in 0..600 {
            solver.update(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, Vec3::Y, 0.016, &scene);
        }
        assert!(
            (solver.current_pitch() - solver.default_pitch()).abs() < 0.5,
            "pitch {} did not converge to default",
            solver.current_pitch()
        );
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = PitchConfig { default_pitch: 25.0, ..Default::default() };
        let json = serde_json::to_string(&config).unwrap();
        let back: PitchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
