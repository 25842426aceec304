//! Simulation Sequencing
//!
//! Pause state and the one camera transition that depends on it. The
//! original sin of sequencing code is global mutable state; here the pause
//! flag lives in a [`PauseSignal`] owned by the host, and each tick's
//! timing travels in a [`SimContext`] value instead of being read from
//! ambient statics.

use glam::Vec3;
use tracing::info;

/// Per-tick simulation context handed to everything that updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    /// Seconds of simulated time this tick covers.
    pub dt: f32,
    /// Whether gameplay is paused. Paused ticks skip input processing and
    /// agent movement; the camera keeps tracking, and pause-aware
    /// transitions (see [`CameraReturn`]) advance.
    pub paused: bool,
}

impl SimContext {
    /// A running tick of `dt` seconds.
    pub fn running(dt: f32) -> Self {
        Self { dt, paused: false }
    }

    /// A paused tick of `dt` seconds.
    pub fn paused(dt: f32) -> Self {
        Self { dt, paused: true }
    }
}

/// Pause flag with transition observers.
///
/// Observers registered at setup fire on actual transitions only; calling
/// [`pause`](PauseSignal::pause) twice notifies once.
#[derive(Default)]
pub struct PauseSignal {
    paused: bool,
    on_pause: Vec<Box<dyn FnMut()>>,
    on_resume: Vec<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for PauseSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PauseSignal")
            .field("paused", &self.paused)
            .field("on_pause", &self.on_pause.len())
            .field("on_resume", &self.on_resume.len())
            .finish()
    }
}

impl PauseSignal {
    /// Create an unpaused signal with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether gameplay is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Register a callback for running -> paused transitions.
    pub fn on_pause(&mut self, callback: impl FnMut() + 'static) {
        self.on_pause.push(Box::new(callback));
    }

    /// Register a callback for paused -> running transitions.
    pub fn on_resume(&mut self, callback: impl FnMut() + 'static) {
        self.on_resume.push(Box::new(callback));
    }

    /// Pause gameplay, notifying observers if this is a transition.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        info!("game paused");
        for callback in &mut self.on_pause {
            callback();
        }
    }

    /// Resume gameplay, notifying observers if this is a transition.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        info!("game resumed");
        for callback in &mut self.on_resume {
            callback();
        }
    }

    /// A tick context carrying the current pause state.
    pub fn context(&self, dt: f32) -> SimContext {
        SimContext {
            dt,
            paused: self.paused,
        }
    }
}

/// Progress of a [`CameraReturn`] transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnStatus {
    /// Still lerping toward the rig camera.
    Returning,
    /// Within the arrival threshold; the rig camera can take over.
    Complete,
}

/// Lerps a detached cinematic camera back to the rig camera.
///
/// Runs during the paused tail of a cinematic: each paused frame moves the
/// detached camera a fixed fraction of the remaining distance, finishing
/// when within the arrival threshold. Unpaused frames do not advance; the
/// host is expected to cut straight to the rig camera once gameplay
/// resumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraReturn {
    position: Vec3,
    /// Fraction of the remaining distance covered per frame.
    return_speed: f32,
    /// Distance at which the transition counts as arrived.
    arrival_distance: f32,
}

impl CameraReturn {
    /// Per-frame lerp fraction used by [`CameraReturn::new`].
    pub const RETURN_SPEED: f32 = 0.02;

    /// Arrival threshold used by [`CameraReturn::new`].
    pub const ARRIVAL_DISTANCE: f32 = 0.01;

    /// Start a return transition from the detached camera's position.
    pub fn new(start: Vec3) -> Self {
        Self {
            position: start,
            return_speed: Self::RETURN_SPEED,
            arrival_distance: Self::ARRIVAL_DISTANCE,
        }
    }

    /// Current position of the returning camera.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Advance the transition one frame toward `target`.
    pub fn step(&mut self, target: Vec3, ctx: SimContext) -> ReturnStatus {
        if self.position.distance(target) <= self.arrival_distance {
            return ReturnStatus::Complete;
        }
        if !ctx.paused {
            return ReturnStatus::Returning;
        }
        self.position += (target - self.position) * self.return_speed;
        if self.position.distance(target) <= self.arrival_distance {
            ReturnStatus::Complete
        } else {
            ReturnStatus::Returning
        }
    }
}
