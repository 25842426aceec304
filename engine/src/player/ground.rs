//! Ground Slope Sensing
//!
//! Detects walkable ground under the agent by casting short down-rays from
//! the center and corners of the ground-detector volume. The result is the
//! minimum angle between any hit normal and the agent's up axis;
//! [`NO_GROUND`] (infinity) means no ray reached ground.
//!
//! The sensor also tracks a trigger-volume contact count. A narrow ledge
//! can touch the detector without any of the five rays landing a clean
//! hit; the contact count is what keeps the agent grounded in that case.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::{RayProbe, SurfaceMask};

/// Sentinel slope meaning "no ground found under any sample point".
pub const NO_GROUND: f32 = f32::INFINITY;

/// Per-tick ground reading consumed by the locomotion controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Minimum detected slope in degrees, or [`NO_GROUND`].
    pub slope_deg: f32,
    /// Number of non-trigger volumes currently overlapping the detector.
    pub contact_count: u32,
}

impl GroundContact {
    /// Whether the agent counts as standing on walkable ground.
    ///
    /// Grounded when the slope is within the limit, or when no slope was
    /// detected at all but something is overlapping the detector volume
    /// (narrow geometry the rays slipped past).
    pub fn is_grounded(&self, slope_limit: f32) -> bool {
        if self.slope_deg <= slope_limit {
            return true;
        }
        if self.slope_deg < NO_GROUND {
            return false;
        }
        self.contact_count > 0
    }

    /// Speed multiplier for moving and jumping on the current ground.
    ///
    /// `(slope_limit - slope) / slope_limit` on a detected slope, so steep
    /// ground slows the agent down. When grounding came only from the
    /// contact count there is no slope reading to attenuate by; the factor
    /// is exactly 1.0 so the agent cannot get stuck on narrow geometry.
    /// Airborne agents get 0.0.
    pub fn slope_adjustment(&self, slope_limit: f32) -> f32 {
        if slope_limit <= 0.0 || !self.is_grounded(slope_limit) {
            return 0.0;
        }
        if self.slope_deg <= slope_limit {
            return (slope_limit - self.slope_deg) / slope_limit;
        }
        1.0
    }
}

/// Samples the ground under a box-shaped detector volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSlopeSensor {
    /// Half extents of the detector volume.
    half_extents: Vec3,
    /// Layers that count as ground.
    mask: SurfaceMask,
    /// Live overlap count, fed by trigger enter/exit events.
    #[serde(skip)]
    contact_count: u32,
}

impl GroundSlopeSensor {
    /// Create a sensor for a detector volume with the given half extents.
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            mask: SurfaceMask::ALL,
            contact_count: 0,
        }
    }

    /// Restrict ground detection to the given layers.
    pub fn with_mask(mut self, mask: SurfaceMask) -> Self {
        self.mask = mask;
        self
    }

    /// Half extents of the detector volume.
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// A non-trigger volume started overlapping the detector.
    pub fn contact_entered(&mut self) {
        self.contact_count += 1;
    }

    /// A non-trigger volume stopped overlapping the detector.
    pub fn contact_exited(&mut self) {
        self.contact_count = self.contact_count.saturating_sub(1);
    }

    /// Current overlap count.
    pub fn contact_count(&self) -> u32 {
        self.contact_count
    }

    /// Minimum ground slope under the detector volume, in degrees.
    ///
    /// Down-rays are cast from the volume center (raised half-way up the
    /// vertical half extent) and from the four horizontal corners at that
    /// same height. Each ray is the full volume height plus a small
    /// epsilon long. Returns [`NO_GROUND`] when every ray misses.
    pub fn sample_slope<P: RayProbe>(&self, center: Vec3, up: Vec3, probe: &P) -> f32 {
        let half = self.half_extents;
        let (side_a, side_b) = up.any_orthonormal_pair();
        let middle = center + up * (half.y * 0.5);
        let ray_length = half.y * 2.0 + 0.01;

        let mut angle = self.ground_angle(middle, up, ray_length, probe);
        for (sx, sz) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            let corner = middle + side_a * (half.x * sx) + side_b * (half.z * sz);
            angle = angle.min(self.ground_angle(corner, up, ray_length, probe));
        }
        angle
    }

    /// Combined slope sample and contact count for this tick.
    pub fn probe_contact<P: RayProbe>(&self, center: Vec3, up: Vec3, probe: &P) -> GroundContact {
        GroundContact {
            slope_deg: self.sample_slope(center, up, probe),
            contact_count: self.contact_count,
        }
    }

    /// Angle of the ground below a single sample point, or [`NO_GROUND`].
    fn ground_angle<P: RayProbe>(&self, origin: Vec3, up: Vec3, length: f32, probe: &P) -> f32 {
        match probe.cast_nearest(origin, -up, length, self.mask) {
            Some(hit) => hit.normal.angle_between(up).to_degrees(),
            None => NO_GROUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{AabbScene, RayHit, SceneBox, SurfaceId, SurfaceTag};

    /// Probe whose five consecutive casts return scripted slope normals.
    struct SlopedProbe {
        normals: std::cell::RefCell<Vec<Option<Vec3>>>,
    }

    impl SlopedProbe {
        fn new(slopes_deg: Vec<Option<f32>>) -> Self {
            let normals = slopes_deg
                .into_iter()
                .map(|s| {
                    s.map(|deg| {
                        let rad = deg.to_radians();
                        Vec3::new(rad.sin(), rad.cos(), 0.0)
                    })
                })
                .rev()
                .collect();
            Self {
                normals: std::cell::RefCell::new(normals),
            }
        }
    }

    impl RayProbe for SlopedProbe {
        fn cast_all(&self, origin: Vec3, _: Vec3, _: f32, _: SurfaceMask) -> Vec<RayHit> {
            match self.normals.borrow_mut().pop().flatten() {
                Some(normal) => vec![RayHit {
                    point: origin - Vec3::Y,
                    normal,
                    distance: 1.0,
                    surface: SurfaceId(0),
                    tag: SurfaceTag::Normal,
                }],
                None => Vec::new(),
            }
        }
    }

    #[test]
    fn test_flat_ground_is_zero_slope() {
        let mut scene = AabbScene::new();
        scene.add(SceneBox::from_center(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            0,
            SurfaceTag::Normal,
        ));

        let sensor = GroundSlopeSensor::new(Vec3::new(0.4, 0.5, 0.4));
        let slope = sensor.sample_slope(Vec3::new(0.0, 0.4, 0.0), Vec3::Y, &scene);
        assert!(slope.abs() < 1e-3, "flat ground gave slope {slope}");
    }

    #[test]
    fn test_no_ground_returns_sentinel() {
        let scene = AabbScene::new();
        let sensor = GroundSlopeSensor::new(Vec3::new(0.4, 0.5, 0.4));
        let slope = sensor.sample_slope(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, &scene);
        assert_eq!(slope, NO_GROUND);
    }

    #[test]
    fn test_minimum_slope_across_samples() {
        // Center + four corners: 10, 20, 70, miss, miss
        let probe = SlopedProbe::new(vec![
            Some(10.0),
            Some(20.0),
            Some(70.0),
            None,
            None,
        ]);
        let sensor = GroundSlopeSensor::new(Vec3::new(0.4, 0.5, 0.4));
        let slope = sensor.sample_slope(Vec3::ZERO, Vec3::Y, &probe);
        assert!((slope - 10.0).abs() < 1e-3, "expected 10 degrees, got {slope}");
    }

    #[test]
    fn test_grounded_on_walkable_slope() {
        let contact = GroundContact { slope_deg: 10.0, contact_count: 0 };
        assert!(contact.is_grounded(60.0));
        assert!((contact.slope_adjustment(60.0) - 50.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_not_grounded_on_steep_slope_even_with_contacts() {
        let contact = GroundContact { slope_deg: 75.0, contact_count: 3 };
        assert!(!contact.is_grounded(60.0));
        assert_eq!(contact.slope_adjustment(60.0), 0.0);
    }

    #[test]
    fn test_contact_fallback_grounds_without_slope() {
        let contact = GroundContact { slope_deg: NO_GROUND, contact_count: 1 };
        assert!(contact.is_grounded(60.0));
        // No slope reading: no speed penalty
        assert_eq!(contact.slope_adjustment(60.0), 1.0);
    }

    #[test]
    fn test_no_slope_no_contacts_is_airborne() {
        let contact = GroundContact { slope_deg: NO_GROUND, contact_count: 0 };
        assert!(!contact.is_grounded(60.0));
        assert_eq!(contact.slope_adjustment(60.0), 0.0);
    }

    #[test]
    fn test_degenerate_slope_limit() {
        let contact = GroundContact { slope_deg: 0.0, contact_count: 0 };
        assert_eq!(contact.slope_adjustment(0.0), 0.0);
    }

    #[test]
    fn test_contact_count_tracking() {
        let mut sensor = GroundSlopeSensor::new(Vec3::splat(0.5));
        assert_eq!(sensor.contact_count(), 0);
        sensor.contact_entered();
        sensor.contact_entered();
        sensor.contact_exited();
        assert_eq!(sensor.contact_count(), 1);
        sensor.contact_exited();
        sensor.contact_exited(); // never underflows
        assert_eq!(sensor.contact_count(), 0);
    }
}
