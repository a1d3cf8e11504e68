//! Transform engine - tilt + parameters -> derived visual state
//!
//! Everything here is a pure function. The same tilt and parameters always
//! produce the same output, and no input is invalid: ranges are enforced
//! when parameters are edited, not here.
//!
//! ## Axis conventions
//!
//! - Rotation is cross-axis: vertical tilt (`y`) turns the capsule about the
//!   horizontal screen axis, horizontal tilt (`x`) about the vertical one.
//! - `invert_rotation_direction` flips both rotation axes but only the X
//!   component of the shadow. The shadow's Y never flips, so the light reads
//!   as fixed above the scene.
//! - Gradient anchors live in the unit square with Y pointing down.

use super::tilt::TiltSample;
use crate::params::VisualParameters;

/// Fixed strength of the moving light
pub const LIGHTING_INTENSITY: f32 = 0.5;

/// Shadow travel in pixels per unit of scaled tilt at full lighting intensity
pub const SHADOW_TRAVEL: f32 = 15.0;

/// Everything the renderer needs, recomputed from scratch each frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DerivedVisualState {
    /// Rotation about the horizontal screen axis
    pub x_rotation_degrees: f32,
    /// Rotation about the vertical screen axis
    pub y_rotation_degrees: f32,
    /// Shadow translation in pixels
    pub shadow_offset: (f32, f32),
    /// Highlight gradient start, unit-square coordinates
    pub gradient_start: (f32, f32),
    /// Highlight gradient end, the start reflected through the centre
    pub gradient_end: (f32, f32),
}

/// Derive the full visual state for one frame
pub fn derive(tilt: TiltSample, params: &VisualParameters) -> DerivedVisualState {
    let (x_rotation_degrees, y_rotation_degrees) = rotation_degrees(tilt, params);

    let (gx, gy) = if params.enable_lighting_motion {
        (-tilt.x, -tilt.y)
    } else {
        (0.0, 0.0)
    };
    let responsiveness = params.motion_responsiveness;

    DerivedVisualState {
        x_rotation_degrees,
        y_rotation_degrees,
        shadow_offset: shadow_offset(tilt, params),
        gradient_start: gradient_start_point(gx, gy, responsiveness),
        gradient_end: gradient_end_point(gx, gy, responsiveness),
    }
}

/// Rotation angles (x, y) in degrees.
///
/// Both are exactly zero when shape motion is disabled.
pub fn rotation_degrees(tilt: TiltSample, params: &VisualParameters) -> (f32, f32) {
    if !params.enable_shape_motion {
        return (0.0, 0.0);
    }

    let scaled = tilt.scaled(params.motion_responsiveness);
    let intensity = params.rotation_intensity;

    if params.invert_rotation_direction {
        (-scaled.y * intensity, scaled.x * intensity)
    } else {
        (scaled.y * intensity, -scaled.x * intensity)
    }
}

/// Shadow offset (x, y) in pixels.
///
/// Zero when lighting motion is disabled. Only X follows the inversion toggle.
pub fn shadow_offset(tilt: TiltSample, params: &VisualParameters) -> (f32, f32) {
    if !params.enable_lighting_motion {
        return (0.0, 0.0);
    }

    let scaled = tilt.scaled(params.motion_responsiveness);
    let travel = LIGHTING_INTENSITY * SHADOW_TRAVEL;

    let x = if params.invert_rotation_direction {
        scaled.x
    } else {
        -scaled.x
    };

    (x * travel, -scaled.y * travel)
}

/// Where the highlight gradient begins, for an effective light direction `(x, y)`.
///
/// The half-offset is clamped so the anchor never leaves the unit square.
pub fn gradient_start_point(x: f32, y: f32, responsiveness: f32) -> (f32, f32) {
    let nx = 0.5 + (x * responsiveness * 0.5).clamp(-0.5, 0.5);
    let ny = 0.5 - (y * responsiveness * 0.5).clamp(-0.5, 0.5);
    (nx, ny)
}

/// Where the highlight gradient ends: the start reflected through the centre
pub fn gradient_end_point(x: f32, y: f32, responsiveness: f32) -> (f32, f32) {
    let (sx, sy) = gradient_start_point(x, y, responsiveness);
    (1.0 - sx, 1.0 - sy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn sample_tilts() -> Vec<TiltSample> {
        let mut tilts = Vec::new();
        for i in -6..=6 {
            for j in -6..=6 {
                tilts.push(TiltSample::new(i as f32 * 0.37, j as f32 * 0.29));
            }
        }
        tilts.push(TiltSample::new(1e6, -1e6));
        tilts
    }

    #[test]
    fn test_zero_responsiveness_kills_motion() {
        for invert in [true, false] {
            let params = VisualParameters {
                motion_responsiveness: 0.0,
                invert_rotation_direction: invert,
                ..VisualParameters::default()
            };
            for tilt in sample_tilts() {
                let d = derive(tilt, &params);
                assert_eq!(d.x_rotation_degrees, 0.0);
                assert_eq!(d.y_rotation_degrees, 0.0);
                assert_eq!(d.shadow_offset.0, 0.0);
                assert_eq!(d.shadow_offset.1, 0.0);
            }
        }
    }

    #[test]
    fn test_shape_motion_disabled() {
        let params = VisualParameters {
            enable_shape_motion: false,
            ..VisualParameters::default()
        };
        let tilt = TiltSample::new(0.8, -0.6);
        let d = derive(tilt, &params);
        assert_eq!(d.x_rotation_degrees, 0.0);
        assert_eq!(d.y_rotation_degrees, 0.0);
        // Other effects still follow the tilt
        assert!(d.shadow_offset.0.abs() > 0.0);
        assert_eq!(tilt, TiltSample::new(0.8, -0.6));
    }

    #[test]
    fn test_inverted_rotation_reference_values() {
        let params = VisualParameters {
            invert_rotation_direction: true,
            rotation_intensity: 20.0,
            motion_responsiveness: 1.0,
            ..VisualParameters::default()
        };
        let (x, y) = rotation_degrees(TiltSample::new(0.5, 0.0), &params);
        assert_eq!(x, 0.0);
        assert!((y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_non_inverted_flips_both_angles() {
        let inverted = VisualParameters::default();
        let straight = VisualParameters {
            invert_rotation_direction: false,
            ..VisualParameters::default()
        };
        for tilt in sample_tilts() {
            let (ax, ay) = rotation_degrees(tilt, &inverted);
            let (bx, by) = rotation_degrees(tilt, &straight);
            assert_eq!(ax, -bx);
            assert_eq!(ay, -by);
        }
    }

    #[test]
    fn test_shadow_inversion_is_x_only() {
        let inverted = VisualParameters::default();
        let straight = VisualParameters {
            invert_rotation_direction: false,
            ..VisualParameters::default()
        };
        let tilt = TiltSample::new(0.4, 0.6);
        let (ax, ay) = shadow_offset(tilt, &inverted);
        let (bx, by) = shadow_offset(tilt, &straight);

        assert!((ax - 0.4 * 7.5).abs() < EPS);
        assert!((ay - (-0.6 * 7.5)).abs() < EPS);
        assert_eq!(ax, -bx);
        assert_eq!(ay, by);
    }

    #[test]
    fn test_lighting_disabled() {
        let params = VisualParameters {
            enable_lighting_motion: false,
            ..VisualParameters::default()
        };
        let d = derive(TiltSample::new(0.9, 0.9), &params);
        assert_eq!(d.shadow_offset, (0.0, 0.0));
        assert_eq!(d.gradient_start, (0.5, 0.5));
        assert_eq!(d.gradient_end, (0.5, 0.5));
        // Shape motion is independent
        assert!(d.y_rotation_degrees != 0.0);
    }

    #[test]
    fn test_gradient_end_is_reflection() {
        for tilt in sample_tilts() {
            for r in [0.0, 0.25, 1.0] {
                let (sx, sy) = gradient_start_point(tilt.x, tilt.y, r);
                let (ex, ey) = gradient_end_point(tilt.x, tilt.y, r);
                assert_eq!(ex, 1.0 - sx);
                assert_eq!(ey, 1.0 - sy);
            }
        }
    }

    #[test]
    fn test_gradient_anchors_in_unit_square() {
        let params = VisualParameters::default();
        for tilt in sample_tilts() {
            let d = derive(tilt, &params);
            for (x, y) in [d.gradient_start, d.gradient_end] {
                assert!((0.0..=1.0).contains(&x), "x = {}", x);
                assert!((0.0..=1.0).contains(&y), "y = {}", y);
            }
        }
    }

    #[test]
    fn test_gradient_follows_negated_tilt() {
        let params = VisualParameters::default();
        // Tilt right and up: light comes from the left and below in unit space
        let d = derive(TiltSample::new(0.5, 0.5), &params);
        assert!((d.gradient_start.0 - 0.25).abs() < EPS);
        assert!((d.gradient_start.1 - 0.75).abs() < EPS);
        assert!((d.gradient_end.0 - 0.75).abs() < EPS);
        assert!((d.gradient_end.1 - 0.25).abs() < EPS);
    }

    #[test]
    fn test_level_device_is_neutral() {
        let d = derive(TiltSample::LEVEL, &VisualParameters::default());
        assert_eq!(d.x_rotation_degrees, 0.0);
        assert_eq!(d.y_rotation_degrees, 0.0);
        assert_eq!(d.shadow_offset, (0.0, 0.0));
        assert_eq!(d.gradient_start, (0.5, 0.5));
    }

    #[test]
    fn test_deterministic() {
        let params = VisualParameters::default();
        let tilt = TiltSample::new(0.123, -0.456);
        assert_eq!(derive(tilt, &params), derive(tilt, &params));
    }
}
