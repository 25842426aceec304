//! Player Module
//!
//! Ground sensing and slope-aware locomotion for the player agent.
//!
//! # Components
//!
//! - [`GroundSlopeSensor`] - down-ray slope sampling under the agent's
//!   ground-detector volume, plus trigger-contact tracking
//! - [`LocomotionController`] - heading-relative movement, slope speed
//!   attenuation, and jump impulses

pub mod ground;
pub mod movement_controller;

pub use ground::{GroundContact, GroundSlopeSensor, NO_GROUND};
pub use movement_controller::{LocomotionConfig, LocomotionController};
