//! Motion module - turns tilt into visual quantities
//!
//! This module provides:
//! - `TiltSample`, the latest 2-axis reading
//! - The pure transform engine (`derive` and friends)
//! - `MotionState`, which pairs the latest tilt with the parameter store

mod state;
mod tilt;
mod transform;

pub use state::MotionState;
pub use tilt::TiltSample;
#[allow(unused_imports)]
pub use transform::{
    derive, gradient_end_point, gradient_start_point, rotation_degrees, shadow_offset,
    DerivedVisualState, LIGHTING_INTENSITY, SHADOW_TRAVEL,
};
