//! Camera Hints
//!
//! Level designers mark regions where the standard camera tuning works
//! poorly (tight corridors, vistas, stairwells) with a hint carrying
//! override values. When the agent enters the region the hint saves the
//! live values and installs its own; on exit it puts the saved values back
//! exactly.
//!
//! The save slot is a single slot, not a stack: with overlapping hint
//! regions, the second apply overwrites the slot and the original values
//! are lost until the first region's restore. Keep hint regions disjoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::occlusion::OcclusionZoomSolver;
use super::pitch::PitchSolver;

/// Camera parameter overrides for a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraHint {
    /// Replacement default zoom.
    pub default_zoom: f32,
    /// Replacement default pitch.
    pub default_pitch: f32,
    /// Replacement upward pitch limit.
    pub max_pitch_up: f32,
    /// Replacement downward pitch limit.
    pub max_pitch_down: f32,
    /// Saved pre-override values, present while the hint is applied.
    #[serde(skip)]
    saved: Option<SavedParams>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedParams {
    default_zoom: f32,
    default_pitch: f32,
    max_pitch_up: f32,
    max_pitch_down: f32,
}

impl CameraHint {
    /// Create a hint with the given override values.
    pub fn new(
        default_zoom: f32,
        default_pitch: f32,
        max_pitch_up: f32,
        max_pitch_down: f32,
    ) -> Self {
        Self {
            default_zoom,
            default_pitch,
            max_pitch_up,
            max_pitch_down,
            saved: None,
        }
    }

    /// Whether the hint currently holds saved values.
    pub fn is_applied(&self) -> bool {
        self.saved.is_some()
    }

    /// Save the solvers' live values and install the overrides.
    pub fn apply(&mut self, zoom: &mut OcclusionZoomSolver, pitch: &mut PitchSolver) {
        self.saved = Some(SavedParams {
            default_zoom: zoom.default_zoom(),
            default_pitch: pitch.default_pitch(),
            max_pitch_up: pitch.max_pitch_up(),
            max_pitch_down: pitch.max_pitch_down(),
        });
        zoom.set_default_zoom(self.default_zoom);
        pitch.set_default_pitch(self.default_pitch);
        pitch.set_max_pitch_up(self.max_pitch_up);
        pitch.set_max_pitch_down(self.max_pitch_down);
        debug!(
            default_zoom = self.default_zoom,
            default_pitch = self.default_pitch,
            "camera hint applied"
        );
    }

    /// Put the saved values back, exactly as they were.
    ///
    /// Does nothing when the hint was never applied.
    pub fn restore(&mut self, zoom: &mut OcclusionZoomSolver, pitch: &mut PitchSolver) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        zoom.set_default_zoom(saved.default_zoom);
        pitch.set_default_pitch(saved.default_pitch);
        pitch.set_max_pitch_up(saved.max_pitch_up);
        pitch.set_max_pitch_down(saved.max_pitch_down);
        debug!("camera hint restored");
    }
}
