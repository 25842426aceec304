//! Orbitcam Engine Library
//!
//! An adaptive third-person follow-camera rig with slope-aware locomotion,
//! independent of any rendering, windowing, or physics engine. All spatial
//! queries go through the [`physics::RayProbe`] trait, so the rig runs
//! against the built-in AABB scene in tests and against a real physics
//! engine in a game.
//!
//! # Modules
//!
//! - [`math`] - Angle normalization, rate-limited interpolation, ray fan
//!   geometry helpers
//! - [`input`] - Platform-agnostic key state with jump edge detection
//! - [`physics`] - The [`physics::RayProbe`] capability and the shipped
//!   AABB scene backend
//! - [`player`] - Ground slope sensing and slope-aware locomotion
//! - [`camera`] - Occlusion zoom, terrain pitch, yaw following, hints
//! - [`rig`] - The assembled [`rig::CameraRig`] and its builder
//! - [`sequence`] - Pause signal, tick context, return-to-player camera
//!
//! # Example
//!
//! ```
//! use orbitcam_engine::input::{KeyCode, MovementKeys};
//! use orbitcam_engine::physics::{AabbScene, SceneBox, SurfaceTag};
//! use orbitcam_engine::rig::{AgentState, RigBuilder};
//! use orbitcam_engine::sequence::SimContext;
//! use glam::Vec3;
//!
//! // A floor to stand on
//! let mut scene = AabbScene::new();
//! scene.add(SceneBox::from_center(
//!     Vec3::new(0.0, -0.5, 0.0),
//!     Vec3::new(100.0, 0.5, 100.0),
//!     0,
//!     SurfaceTag::Normal,
//! ));
//!
//! // Assemble the rig
//! let mut rig = RigBuilder::new()
//!     .agent(AgentState::at(Vec3::new(0.0, 0.4, 0.0)))
//!     .eye_offset(Vec3::new(0.0, 1.5, 0.0))
//!     .ground_detector(Vec3::new(0.4, 0.5, 0.4))
//!     .build()
//!     .unwrap();
//!
//! // Walk forward for one tick
//! let mut keys = MovementKeys::new();
//! keys.handle_key(KeyCode::W, true);
//! let out = rig.tick(SimContext::running(1.0 / 60.0), &mut keys, &scene);
//! assert!(out.grounded);
//! ```

pub mod camera;
pub mod input;
pub mod math;
pub mod physics;
pub mod player;
pub mod rig;
pub mod sequence;
