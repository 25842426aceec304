//! Camera Rig Assembly
//!
//! Wires the five solvers into one object with a fixed per-tick update
//! order: ground slope, locomotion, yaw, pitch, occlusion zoom. Each stage
//! reads state written by the stages before it and never reaches back, so
//! a tick is a single left-to-right pass.
//!
//! The rig owns the agent transform and the pivot angles. Hosts feed it a
//! [`SimContext`], the key state, and a ray probe every fixed tick, and
//! read back the camera world position and the occluded surface set.
//!
//! # Coordinate conventions
//!
//! World up is `+Y`. Heading 0 faces `-Z`; positive headings turn toward
//! `+X`. Positive pitch looks down. The camera hangs behind and above the
//! agent on a boom whose local offset is `(0, zoom/5, -zoom)`.

use std::collections::HashSet;

use glam::{Quat, Vec3};
use thiserror::Error;
use tracing::info;

use crate::camera::{
    OcclusionConfig, OcclusionZoomSolver, PitchConfig, PitchSolver, YawConfig, YawFollower,
    ZoomUpdate,
};
use crate::input::MovementKeys;
use crate::physics::{RayProbe, SurfaceId};
use crate::player::{GroundContact, GroundSlopeSensor, LocomotionConfig, LocomotionController};
use crate::sequence::SimContext;

/// Rig construction failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RigError {
    /// A required node binding was never provided to the builder.
    #[error("camera rig is missing required node `{0}`")]
    MissingNode(&'static str),
}

/// The agent the rig follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentState {
    /// World position of the agent's base.
    pub position: Vec3,
    /// Facing in degrees, normalized into `(-180, 180]`.
    pub heading_deg: f32,
    /// Current velocity.
    pub velocity: Vec3,
}

impl AgentState {
    /// An agent at rest at a position, facing heading zero.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            heading_deg: 0.0,
            velocity: Vec3::ZERO,
        }
    }
}

/// Builds a [`CameraRig`], failing fast on missing required bindings.
///
/// Required: the agent, the eye offset (move pivot), and the ground
/// detector extents. Solver tuning is optional and defaults to the
/// standard configs.
#[derive(Debug, Default)]
pub struct RigBuilder {
    agent: Option<AgentState>,
    eye_offset: Option<Vec3>,
    detector_half_extents: Option<Vec3>,
    occlusion: OcclusionConfig,
    pitch: PitchConfig,
    yaw: YawConfig,
    locomotion: LocomotionConfig,
    self_surfaces: Vec<SurfaceId>,
}

impl RigBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The agent the rig follows. Required.
    pub fn agent(mut self, agent: AgentState) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Eye point offset from the agent's base, where occlusion rays start
    /// and the boom attaches. Required.
    pub fn eye_offset(mut self, offset: Vec3) -> Self {
        self.eye_offset = Some(offset);
        self
    }

    /// Half extents of the ground detector volume. Required.
    pub fn ground_detector(mut self, half_extents: Vec3) -> Self {
        self.detector_half_extents = Some(half_extents);
        self
    }

    /// Replace the occlusion zoom tuning.
    pub fn occlusion_config(mut self, config: OcclusionConfig) -> Self {
        self.occlusion = config;
        self
    }

    /// Replace the pitch tuning.
    pub fn pitch_config(mut self, config: PitchConfig) -> Self {
        self.pitch = config;
        self
    }

    /// Replace the yaw tuning.
    pub fn yaw_config(mut self, config: YawConfig) -> Self {
        self.yaw = config;
        self
    }

    /// Replace the locomotion tuning.
    pub fn locomotion_config(mut self, config: LocomotionConfig) -> Self {
        self.locomotion = config;
        self
    }

    /// Register the agent's own surfaces for transparency flagging.
    pub fn self_surfaces(mut self, surfaces: Vec<SurfaceId>) -> Self {
        self.self_surfaces = surfaces;
        self
    }

    /// Build the rig, or report the first missing required binding.
    pub fn build(self) -> Result<CameraRig, RigError> {
        let agent = self.agent.ok_or(RigError::MissingNode("agent"))?;
        let eye_offset = self.eye_offset.ok_or(RigError::MissingNode("eye_offset"))?;
        let half_extents = self
            .detector_half_extents
            .ok_or(RigError::MissingNode("ground_detector"))?;

        let mut yaw = YawFollower::new(self.yaw);
        yaw.snap_to(agent.heading_deg);

        info!(
            position = ?agent.position,
            default_zoom = self.occlusion.default_zoom,
            "camera rig built"
        );

        Ok(CameraRig {
            agent,
            eye_offset,
            ground_sensor: GroundSlopeSensor::new(half_extents),
            locomotion: LocomotionController::with_config(self.locomotion),
            yaw,
            pitch: PitchSolver::new(self.pitch),
            zoom: OcclusionZoomSolver::new(self.occlusion)
                .with_self_surfaces(self.self_surfaces),
        })
    }
}

/// What one tick produced, for consumers outside the rig.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Surfaces occluding the camera this tick.
    pub occluded: HashSet<SurfaceId>,
    /// Whether the agent ended the tick on walkable ground.
    pub grounded: bool,
    /// The tick's ground slope reading in degrees, or infinity.
    pub slope_deg: f32,
    /// Boom length after this tick.
    pub zoom: f32,
}

/// The assembled adaptive follow-camera rig.
#[derive(Debug)]
pub struct CameraRig {
    agent: AgentState,
    eye_offset: Vec3,
    ground_sensor: GroundSlopeSensor,
    locomotion: LocomotionController,
    yaw: YawFollower,
    pitch: PitchSolver,
    zoom: OcclusionZoomSolver,
}

impl CameraRig {
    /// The agent the rig is following.
    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    /// Teleport the agent, keeping velocity and heading.
    pub fn set_agent_position(&mut self, position: Vec3) {
        self.agent.position = position;
    }

    /// The ground sensor, for feeding trigger contact events.
    pub fn ground_sensor_mut(&mut self) -> &mut GroundSlopeSensor {
        &mut self.ground_sensor
    }

    /// The zoom solver, for camera hints.
    pub fn zoom_solver_mut(&mut self) -> &mut OcclusionZoomSolver {
        &mut self.zoom
    }

    /// The pitch solver, for camera hints.
    pub fn pitch_solver_mut(&mut self) -> &mut PitchSolver {
        &mut self.pitch
    }

    /// Both hint-overridable solvers at once, for
    /// [`CameraHint::apply`](crate::camera::CameraHint::apply) and
    /// [`CameraHint::restore`](crate::camera::CameraHint::restore).
    pub fn hint_targets(&mut self) -> (&mut OcclusionZoomSolver, &mut PitchSolver) {
        (&mut self.zoom, &mut self.pitch)
    }

    /// World-space eye point: where the boom attaches and occlusion rays
    /// originate.
    pub fn eye_position(&self) -> Vec3 {
        self.agent.position + self.eye_offset
    }

    /// Orientation of the camera boom from the current yaw and pitch.
    ///
    /// Maps boom-local `-Z` to "from the eye toward the camera".
    pub fn boom_rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, (180.0 - self.yaw.current_yaw()).to_radians())
            * Quat::from_axis_angle(Vec3::X, self.pitch.current_pitch().to_radians())
    }

    /// Normalized direction from the eye toward the camera.
    pub fn boom_direction(&self) -> Vec3 {
        self.boom_rotation() * Vec3::NEG_Z
    }

    /// World-space camera position for the current zoom and pivot angles.
    pub fn camera_world_position(&self) -> Vec3 {
        let local = OcclusionZoomSolver::camera_local(self.zoom.current_zoom());
        self.eye_position() + self.boom_rotation() * local
    }

    /// Advance the whole rig one fixed tick.
    ///
    /// Stage order: ground slope, locomotion, yaw, pitch, occlusion zoom.
    /// While paused, input and movement are skipped entirely but the
    /// camera stages still track, matching how a paused game keeps its
    /// camera composed behind the (stationary) agent.
    pub fn tick<P: RayProbe>(
        &mut self,
        ctx: SimContext,
        input: &mut MovementKeys,
        probe: &P,
    ) -> TickOutput {
        let contact = self
            .ground_sensor
            .probe_contact(self.agent.position, Vec3::Y, probe);

        if !ctx.paused {
            self.step_locomotion(ctx.dt, input, contact);
        }

        self.yaw.update(self.agent.heading_deg, ctx.dt);

        let forward = LocomotionController::heading_forward(self.agent.heading_deg);
        self.pitch
            .update(self.agent.position, forward, Vec3::Y, ctx.dt, probe);

        let ZoomUpdate { zoom, occluded, .. } =
            self.zoom
                .update(self.eye_position(), self.boom_direction(), ctx.dt, probe);

        TickOutput {
            occluded,
            grounded: contact.is_grounded(self.locomotion.slope_limit()),
            slope_deg: contact.slope_deg,
            zoom,
        }
    }

    /// Apply input, gravity, and integration to the agent for one tick.
    fn step_locomotion(&mut self, dt: f32, input: &mut MovementKeys, contact: GroundContact) {
        self.agent.heading_deg =
            self.locomotion
                .rotate_heading(self.agent.heading_deg, input.turn_axis(), dt);

        let dir = LocomotionController::move_direction(
            self.agent.heading_deg,
            input.forward_axis(),
            input.strafe_axis(),
        );
        self.agent.velocity = self.locomotion.compute_velocity(self.agent.velocity, dir, contact);

        if input.take_jump() {
            if let Some(vertical) = self.locomotion.jump_velocity(self.agent.velocity, contact) {
                self.agent.velocity.y = vertical;
            }
        }

        let grounded = contact.is_grounded(self.locomotion.slope_limit());
        if grounded && self.agent.velocity.y < 0.0 {
            // Resting on ground: stop accumulating fall speed
            self.agent.velocity.y = 0.0;
        } else if !grounded || self.agent.velocity.y > 0.0 {
            self.agent.velocity.y -= self.locomotion.gravity() * dt;
        }

        self.agent.position += self.agent.velocity * dt;
    }
}
