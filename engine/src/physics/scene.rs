//! AABB Scene Probe
//!
//! A small spatial backend made of tagged axis-aligned boxes, implementing
//! [`RayProbe`] with the slab method for ray-AABB intersection. This is
//! what the tests and the demo cast against; a real game would swap in its
//! physics engine behind the same trait.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::probe::{RayHit, RayProbe, SurfaceId, SurfaceMask, SurfaceTag};

/// Performs ray-AABB intersection using the slab method.
///
/// Intersection times with each pair of axis-aligned planes are computed;
/// the ray hits the box when the latest entry time is not after the
/// earliest exit time and the exit is in front of the origin.
///
/// Returns the distance along the ray to the intersection (the exit
/// distance when the origin is inside the box), or `None` for a miss.
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Inverse direction; near-zero components get a huge value so the
    // corresponding slab degenerates correctly
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;
    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;
    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;
    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Computes the outward surface normal for a point on an AABB face.
///
/// The face is chosen by the largest coordinate of the hit point in
/// unit-cube space.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let local = point - center;

    let normalized = Vec3::new(
        local.x / half_extents.x,
        local.y / half_extents.y,
        local.z / half_extents.z,
    );
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.x && abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// One box in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
    /// Layer (0..32) used by [`SurfaceMask`] filtering.
    pub layer: u8,
    /// Occlusion behavior.
    #[serde(default)]
    pub tag: SurfaceTag,
}

impl SceneBox {
    /// Build a box from a center point and half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3, layer: u8, tag: SurfaceTag) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
            layer,
            tag,
        }
    }
}

/// A set of tagged AABBs implementing [`RayProbe`].
///
/// Surface ids are assigned in insertion order and stay stable for the
/// lifetime of the scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AabbScene {
    boxes: Vec<SceneBox>,
}

impl AabbScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box and return its surface id.
    pub fn add(&mut self, scene_box: SceneBox) -> SurfaceId {
        self.boxes.push(scene_box);
        SurfaceId(self.boxes.len() as u32 - 1)
    }

    /// Number of boxes in the scene.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the scene contains no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Look up a box by its surface id.
    pub fn get(&self, id: SurfaceId) -> Option<&SceneBox> {
        self.boxes.get(id.0 as usize)
    }
}

impl RayProbe for AabbScene {
    fn cast_all(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for (index, b) in self.boxes.iter().enumerate() {
            if !mask.contains(b.layer) {
                continue;
            }
            if let Some(t) = ray_aabb_intersect(origin, direction, b.min, b.max) {
                if t <= max_distance {
                    let point = origin + direction * t;
                    hits.push(RayHit {
                        point,
                        normal: aabb_surface_normal(point, b.min, b.max),
                        distance: t,
                        surface: SurfaceId(index as u32),
                        tag: b.tag,
                    });
                }
            }
        }
        hits
    }
}
