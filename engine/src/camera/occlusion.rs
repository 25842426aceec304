//! Occlusion-Driven Zoom
//!
//! Keeps the follow camera's boom length as long as possible without letting
//! scene geometry come between the camera and the agent. Every tick a fan of
//! seven rays is cast from the agent's eye point toward the camera; the
//! nearest ordinary hit across the fan sets the zoom target, and the zoom
//! distance is smoothed toward it with asymmetric rates (snappy in, lazy
//! out).
//!
//! Occlusion-reactive surfaces are special: they never pull the camera in.
//! Instead their ids are collected into the tick's occluded set so a
//! transparency consumer (see [`OcclusionTracker`]) can fade them out.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::{offset_point, rotate_about_up, rotate_vertical};
use crate::physics::{RayProbe, SurfaceId, SurfaceMask, SurfaceTag};

/// Default boom length when nothing occludes.
pub const DEFAULT_ZOOM: f32 = 15.0;

/// Hard outer zoom limit.
pub const MAX_ZOOM: f32 = 1000.0;

/// Hard inner zoom limit.
pub const MIN_ZOOM: f32 = 0.2;

/// Below this zoom the agent's own surfaces get flagged occluded so the
/// model can fade instead of filling the screen.
pub const TRANSPARENT_ZOOM: f32 = 0.45;

/// Tuning for the occlusion zoom solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Boom length when the view is clear.
    pub default_zoom: f32,
    /// Hard outer zoom limit.
    pub max_zoom: f32,
    /// Hard inner zoom limit.
    pub min_zoom: f32,
    /// Zoom below which the agent's own surfaces are flagged occluded.
    pub transparent_zoom: f32,
    /// Smoothing rate when pulling the camera in.
    pub zoom_in_speed: f32,
    /// Smoothing rate when letting the camera back out. Should be a lot
    /// slower than zooming in.
    pub zoom_out_speed: f32,
    /// Sideways ray origin offset, about half the agent's width.
    pub horizontal_offset: f32,
    /// Sideways ray rotation in degrees.
    pub horizontal_rotation_angle: f32,
    /// Upward ray rotation in degrees. Catches incoming ceilings.
    pub upward_rotation_angle: f32,
    /// Downward ray rotation in degrees. Keep this small, otherwise an
    /// ordinary floor pulls the camera in.
    pub downward_rotation_angle: f32,
    /// Stand-off distance from whatever occludes.
    pub zoom_buffer: f32,
    /// Layers that participate in occlusion casts.
    pub mask: SurfaceMask,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            max_zoom: MAX_ZOOM,
            min_zoom: MIN_ZOOM,
            transparent_zoom: TRANSPARENT_ZOOM,
            zoom_in_speed: 10.0,
            zoom_out_speed: 1.0,
            horizontal_offset: 0.5,
            horizontal_rotation_angle: 10.0,
            upward_rotation_angle: 30.0,
            downward_rotation_angle: 5.0,
            zoom_buffer: 0.5,
            mask: SurfaceMask::ALL,
        }
    }
}

/// Result of one zoom update.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomUpdate {
    /// Smoothed boom length after this tick.
    pub zoom: f32,
    /// Camera offset in boom-local space: `(0, zoom/5, -zoom)`. The height
    /// term keeps the agent below screen center.
    pub camera_local: Vec3,
    /// Surfaces occluding the view this tick. Occlusion-reactive hits from
    /// the ray fan, plus the agent's own surfaces when the zoom dropped
    /// below the transparency threshold.
    pub occluded: HashSet<SurfaceId>,
}

/// Seven-ray occlusion fan and zoom smoothing.
#[derive(Debug, Clone)]
pub struct OcclusionZoomSolver {
    config: OcclusionConfig,
    current_zoom: f32,
    /// The agent's own surface ids, flagged below the transparency zoom.
    self_surfaces: Vec<SurfaceId>,
}

impl OcclusionZoomSolver {
    /// Create a solver starting at the default zoom.
    pub fn new(config: OcclusionConfig) -> Self {
        Self {
            current_zoom: config.default_zoom,
            config,
            self_surfaces: Vec::new(),
        }
    }

    /// Register the agent's own surfaces for transparency flagging.
    pub fn with_self_surfaces(mut self, surfaces: Vec<SurfaceId>) -> Self {
        self.self_surfaces = surfaces;
        self
    }

    /// The solver's tuning.
    pub fn config(&self) -> &OcclusionConfig {
        &self.config
    }

    /// Default boom length. Overridable by a camera hint.
    pub fn default_zoom(&self) -> f32 {
        self.config.default_zoom
    }

    /// Override the default boom length.
    pub fn set_default_zoom(&mut self, zoom: f32) {
        self.config.default_zoom = zoom;
    }

    /// Current smoothed boom length.
    pub fn current_zoom(&self) -> f32 {
        self.current_zoom
    }

    /// Snap the boom to a length without smoothing.
    pub fn snap_to(&mut self, zoom: f32) {
        self.current_zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
    }

    /// Run the occlusion fan and advance the zoom one tick.
    ///
    /// `eye` is the agent's eye point and `boom_dir` the normalized
    /// direction from the eye toward the camera. All seven rays are cast
    /// every tick so occlusion-reactive surfaces anywhere in the fan get
    /// flagged even when another ray already forced the minimum zoom.
    pub fn update<P: RayProbe>(
        &mut self,
        eye: Vec3,
        boom_dir: Vec3,
        dt: f32,
        probe: &P,
    ) -> ZoomUpdate {
        let cfg = self.config;
        let mut occluded = HashSet::new();

        // Direct ray, then offset left/right, angled left/right, up, down
        let mut target = self.cast_occlusion_ray(eye, boom_dir, 0.0, 0.0, 0.0, probe, &mut occluded);
        target = target.min(self.cast_occlusion_ray(
            eye,
            boom_dir,
            0.0,
            0.0,
            cfg.horizontal_offset,
            probe,
            &mut occluded,
        ));
        target = target.min(self.cast_occlusion_ray(
            eye,
            boom_dir,
            0.0,
            0.0,
            -cfg.horizontal_offset,
            probe,
            &mut occluded,
        ));
        target = target.min(self.cast_occlusion_ray(
            eye,
            boom_dir,
            cfg.horizontal_rotation_angle,
            0.0,
            0.0,
            probe,
            &mut occluded,
        ));
        target = target.min(self.cast_occlusion_ray(
            eye,
            boom_dir,
            -cfg.horizontal_rotation_angle,
            0.0,
            0.0,
            probe,
            &mut occluded,
        ));
        target = target.min(self.cast_occlusion_ray(
            eye,
            boom_dir,
            0.0,
            cfg.upward_rotation_angle,
            0.0,
            probe,
            &mut occluded,
        ));
        target = target.min(self.cast_occlusion_ray(
            eye,
            boom_dir,
            0.0,
            -cfg.downward_rotation_angle,
            0.0,
            probe,
            &mut occluded,
        ));

        // Close enough that the agent itself blocks the view
        if target < cfg.transparent_zoom {
            occluded.extend(self.self_surfaces.iter().copied());
        }

        let target = target.clamp(cfg.min_zoom, cfg.max_zoom);

        // Zoom in fast when something pushed the target inside the current
        // boom and the boom is within its default reach; drift out slow
        // otherwise
        let speed = if self.current_zoom > target && self.current_zoom <= cfg.default_zoom {
            cfg.zoom_in_speed
        } else {
            cfg.zoom_out_speed
        };
        let t = (speed * dt).min(1.0);
        self.current_zoom += (target - self.current_zoom) * t;
        self.current_zoom = self.current_zoom.clamp(cfg.min_zoom, cfg.max_zoom);

        ZoomUpdate {
            zoom: self.current_zoom,
            camera_local: Self::camera_local(self.current_zoom),
            occluded,
        }
    }

    /// Boom-local camera offset for a given zoom.
    pub fn camera_local(zoom: f32) -> Vec3 {
        Vec3::new(0.0, zoom / 5.0, -zoom)
    }

    /// Cast one ray of the fan and return its zoom candidate.
    ///
    /// Rotations are applied to the ray direction, offsets to the origin.
    /// Occlusion-reactive hits go into `occluded` without constraining the
    /// candidate; the candidate is the nearest ordinary hit minus the zoom
    /// buffer, or the default zoom when nothing ordinary was hit.
    fn cast_occlusion_ray<P: RayProbe>(
        &self,
        eye: Vec3,
        boom_dir: Vec3,
        horizontal_rotation: f32,
        vertical_rotation: f32,
        horizontal_offset: f32,
        probe: &P,
        occluded: &mut HashSet<SurfaceId>,
    ) -> f32 {
        let cfg = &self.config;
        let origin = offset_point(eye, boom_dir, horizontal_offset, 0.0);
        let mut direction = boom_dir;
        if horizontal_rotation != 0.0 {
            direction = rotate_about_up(direction, horizontal_rotation);
        }
        if vertical_rotation != 0.0 {
            direction = rotate_vertical(direction, vertical_rotation);
        }

        let hits = probe.cast_all(origin, direction, cfg.default_zoom + cfg.zoom_buffer, cfg.mask);
        if hits.is_empty() {
            return cfg.default_zoom;
        }

        let mut closest = cfg.default_zoom + cfg.zoom_buffer;
        for hit in hits {
            match hit.tag {
                SurfaceTag::OcclusionReactive => {
                    occluded.insert(hit.surface);
                }
                SurfaceTag::Normal => closest = closest.min(hit.distance),
            }
        }
        closest - cfg.zoom_buffer
    }
}

/// Diffs per-tick occluded sets for a transparency consumer.
///
/// The zoom solver reports which surfaces occlude the view each tick; the
/// tracker turns that into enter/leave events so a material-swap layer only
/// touches surfaces whose state actually changed.
#[derive(Debug, Clone, Default)]
pub struct OcclusionTracker {
    previous: HashSet<SurfaceId>,
}

/// Surfaces whose occlusion state changed between two ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcclusionDiff {
    /// Occluding now, but not last tick.
    pub newly_occluded: Vec<SurfaceId>,
    /// Occluding last tick, but not anymore.
    pub newly_revealed: Vec<SurfaceId>,
}

impl OcclusionTracker {
    /// Create a tracker with an empty previous set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces considered occluding as of the last update.
    pub fn occluded(&self) -> &HashSet<SurfaceId> {
        &self.previous
    }

    /// Absorb this tick's occluded set and report what changed.
    pub fn update(&mut self, current: &HashSet<SurfaceId>) -> OcclusionDiff {
        let newly_occluded = current.difference(&self.previous).copied().collect();
        let newly_revealed = self.previous.difference(current).copied().collect();
        self.previous = current.clone();
        OcclusionDiff {
            newly_occluded,
            newly_revealed,
        }
    }
}
