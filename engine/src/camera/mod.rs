//! Camera Module
//!
//! The three solvers that drive the adaptive follow camera, plus the hint
//! override mechanism and the transparency tracker.
//!
//! # Components
//!
//! - [`OcclusionZoomSolver`] - seven-ray occlusion fan regulating the boom
//!   length, with asymmetric zoom smoothing
//! - [`PitchSolver`] - terrain scan ahead of the agent steering the pitch
//!   pivot
//! - [`YawFollower`] - unclamped smoothing of the yaw pivot toward the
//!   agent heading
//! - [`CameraHint`] - region-scoped parameter overrides with exact restore
//! - [`OcclusionTracker`] - per-tick occluded-set diffing for a
//!   transparency consumer

pub mod hint;
pub mod occlusion;
pub mod pitch;
pub mod yaw;

pub use hint::CameraHint;
pub use occlusion::{
    OcclusionConfig, OcclusionDiff, OcclusionTracker, OcclusionZoomSolver, ZoomUpdate,
};
pub use pitch::{PitchConfig, PitchSolver};
pub use yaw::{YawConfig, YawFollower};
