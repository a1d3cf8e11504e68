//! Render module - draws the tilt-reactive capsule
//!
//! This module provides:
//! - Capsule geometry and its perspective projection
//! - Color blending helpers for the gradient rims
//! - Scene composition into an ordered display list
//! - The egui canvas widget that paints it

mod blend;
mod canvas;
mod capsule;
mod scene;

pub use canvas::Canvas;
#[allow(unused_imports)]
pub use scene::{compose, readout_lines, Layer, ShadowPass, StrokeKind};
