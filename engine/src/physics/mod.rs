//! Physics Query Module
//!
//! The rig consumes the physics world through the [`RayProbe`] trait;
//! [`AabbScene`] is the built-in backend used by the tests and the demo.

pub mod probe;
pub mod scene;

pub use probe::{RayHit, RayProbe, SurfaceId, SurfaceMask, SurfaceTag};
pub use scene::{AabbScene, SceneBox, aabb_surface_normal, ray_aabb_intersect};
