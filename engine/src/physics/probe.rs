//! Ray Probe Capability
//!
//! The camera solvers never talk to a physics engine directly. They consume
//! the [`RayProbe`] trait: cast a ray, get back surface intersections. Any
//! spatial backend (the built-in AABB scene, a voxel grid, an external
//! physics engine binding) can implement it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identifier for a surface known to the probe backend.
///
/// Solvers report occlusion per surface id; consumers map ids back to
/// whatever scene objects they manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// How a surface reacts to occluding the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceTag {
    /// Ordinary geometry: occludes the camera and forces zoom-in.
    #[default]
    Normal,
    /// Occlusion-reactive geometry: flagged for transparency when it blocks
    /// the view, but never constrains the zoom distance.
    OcclusionReactive,
}

/// Bitset selecting which surface layers participate in a cast.
///
/// Layers are small integers (0..32); a surface on layer `n` is hit only
/// when bit `n` is set in the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceMask(pub u32);

impl SurfaceMask {
    /// Every layer participates.
    pub const ALL: SurfaceMask = SurfaceMask(u32::MAX);
    /// No layer participates; every cast misses.
    pub const NONE: SurfaceMask = SurfaceMask(0);

    /// Mask containing exactly one layer.
    pub fn layer(layer: u8) -> Self {
        SurfaceMask(1 << (layer as u32 % 32))
    }

    /// Whether the given layer is selected.
    pub fn contains(&self, layer: u8) -> bool {
        self.0 & (1 << (layer as u32 % 32)) != 0
    }

    /// Union of two masks.
    pub fn union(&self, other: SurfaceMask) -> SurfaceMask {
        SurfaceMask(self.0 | other.0)
    }
}

impl Default for SurfaceMask {
    fn default() -> Self {
        SurfaceMask::ALL
    }
}

/// A single ray/surface intersection.
///
/// Transient: produced per query, never persisted by the solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space intersection point.
    pub point: Vec3,
    /// Surface normal at the intersection (normalized).
    pub normal: Vec3,
    /// Distance from the ray origin to the intersection.
    pub distance: f32,
    /// Identity of the surface that was hit.
    pub surface: SurfaceId,
    /// Occlusion behavior of the surface.
    pub tag: SurfaceTag,
}

/// Synchronous ray casting against some spatial backend.
///
/// `cast_all` returns every intersection within range in arbitrary order;
/// callers that need the closest hit take the minimum themselves or use
/// `cast_nearest`. Directions are expected to be normalized.
pub trait RayProbe {
    /// All intersections along the ray up to `max_distance`, filtered by
    /// `mask`. Order is unspecified.
    fn cast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: SurfaceMask)
    -> Vec<RayHit>;

    /// Nearest intersection along the ray, or `None` when nothing is hit.
    fn cast_nearest(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Option<RayHit> {
        self.cast_all(origin, direction, max_distance, mask)
            .into_iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_layer_membership() {
        let mask = SurfaceMask::layer(3);
        assert!(mask.contains(3));
        assert!(!mask.contains(0));
        assert!(!mask.contains(4));
    }

    #[test]
    fn test_mask_all_and_none() {
        for layer in 0..32 {
            assert!(SurfaceMask::ALL.contains(layer));
            assert!(!SurfaceMask::NONE.contains(layer));
        }
    }

    #[test]
    fn test_mask_union() {
        let mask = SurfaceMask::layer(1).union(SurfaceMask::layer(5));
        assert!(mask.contains(1));
        assert!(mask.contains(5));
        assert!(!mask.contains(2));
    }

    /// A probe with scripted hits to exercise the default cast_nearest.
    struct Scripted(Vec<RayHit>);

    impl RayProbe for Scripted {
        fn cast_all(&self, _: Vec3, _: Vec3, max_distance: f32, _: SurfaceMask) -> Vec<RayHit> {
            self.0
                .iter()
                .copied()
                .filter(|h| h.distance <= max_distance)
                .collect()
        }
    }

    fn hit(distance: f32, surface: u32) -> RayHit {
        RayHit {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            distance,
            surface: SurfaceId(surface),
            tag: SurfaceTag::Normal,
        }
    }

    #[test]
    fn test_cast_nearest_picks_minimum() {
        let probe = Scripted(vec![hit(7.0, 1), hit(2.5, 2), hit(4.0, 3)]);
        let nearest = probe
            .cast_nearest(Vec3::ZERO, Vec3::NEG_Z, 100.0, SurfaceMask::ALL)
            .unwrap();
        assert_eq!(nearest.surface, SurfaceId(2));
        assert_eq!(nearest.distance, 2.5);
    }

    #[test]
    fn test_cast_nearest_empty_is_none() {
        let probe = Scripted(vec![]);
        assert!(
            probe
                .cast_nearest(Vec3::ZERO, Vec3::NEG_Z, 100.0, SurfaceMask::ALL)
                .is_none()
        );
    }
}
