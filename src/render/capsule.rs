//! Capsule geometry and its 3D tilt projection
//!
//! The capsule is a flat stadium outline in the z = 0 plane. It is rotated
//! about the screen's horizontal axis, then its vertical axis, and projected
//! back to 2D with a simple perspective divide.
//!
//! ## Coordinate System
//!
//! Model space is right-handed with Y up and Z towards the viewer. Screen
//! space is egui's: pixels, Y down.

use std::f32::consts::PI;

use nalgebra::{Point3, Rotation3, Vector3};

/// A stadium shape: a rectangle with semicircular ends
#[derive(Clone, Debug)]
pub struct Capsule {
    /// Total width including the rounded ends
    pub width: f32,
    /// Height, equal to the end-cap diameter
    pub height: f32,
    /// Points per end cap
    pub cap_segments: usize,
}

impl Capsule {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(height),
            height,
            cap_segments: 24,
        }
    }

    /// Closed outline, counter-clockwise, centred on the origin
    pub fn outline(&self) -> Vec<Point3<f32>> {
        let r = self.height / 2.0;
        let half_span = self.width / 2.0 - r;
        let n = self.cap_segments.max(2);
        let mut points = Vec::with_capacity(2 * (n + 1));

        // Right cap, bottom to top
        for i in 0..=n {
            let a = -PI / 2.0 + PI * i as f32 / n as f32;
            points.push(Point3::new(half_span + r * a.cos(), r * a.sin(), 0.0));
        }
        // Left cap, top to bottom
        for i in 0..=n {
            let a = PI / 2.0 + PI * i as f32 / n as f32;
            points.push(Point3::new(-half_span + r * a.cos(), r * a.sin(), 0.0));
        }
        points
    }
}

/// Perspective camera looking down -Z at the capsule
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Eye distance from the z = 0 plane, in the same units as the model
    pub distance: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self { distance: 900.0 }
    }
}

impl Projection {
    /// Rotate by the two tilt angles and project to screen space around `center`
    pub fn project(
        &self,
        points: &[Point3<f32>],
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        center: (f32, f32),
    ) -> Vec<(f32, f32)> {
        let about_x = Rotation3::from_axis_angle(&Vector3::x_axis(), x_rotation_degrees.to_radians());
        let about_y = Rotation3::from_axis_angle(&Vector3::y_axis(), y_rotation_degrees.to_radians());
        let rotation = about_x * about_y;

        points
            .iter()
            .map(|p| {
                let r = rotation.transform_point(p);
                // Points that swing towards the eye grow, away from it shrink
                let scale = self.distance / (self.distance - r.z).max(1.0);
                (center.0 + r.x * scale, center.1 - r.y * scale)
            })
            .collect()
    }
}

/// Axis-aligned bounds of projected points as (min, max)
pub fn bounds(points: &[(f32, f32)]) -> Option<((f32, f32), (f32, f32))> {
    let first = *points.first()?;
    let (mut min, mut max) = (first, first);
    for &(x, y) in &points[1..] {
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_extent() {
        let capsule = Capsule::new(200.0, 80.0);
        let outline = capsule.outline();
        let xs: Vec<f32> = outline.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = outline.iter().map(|p| p.y).collect();

        let max_x = xs.iter().cloned().fold(f32::MIN, f32::max);
        let min_y = ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((max_x - 100.0).abs() < 0.01);
        assert!((min_y + 40.0).abs() < 0.01);
        assert!(outline.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_unrotated_projection_is_identity() {
        let capsule = Capsule::new(200.0, 80.0);
        let outline = capsule.outline();
        let projected = Projection::default().project(&outline, 0.0, 0.0, (300.0, 200.0));

        for (p, q) in outline.iter().zip(&projected) {
            assert!((q.0 - (300.0 + p.x)).abs() < 1e-3);
            assert!((q.1 - (200.0 - p.y)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_y_rotation_narrows_width() {
        let capsule = Capsule::new(200.0, 80.0);
        let outline = capsule.outline();
        let flat = bounds(&Projection::default().project(&outline, 0.0, 0.0, (0.0, 0.0))).unwrap();
        let turned = bounds(&Projection::default().project(&outline, 0.0, 40.0, (0.0, 0.0))).unwrap();

        let flat_w = flat.1 .0 - flat.0 .0;
        let turned_w = turned.1 .0 - turned.0 .0;
        assert!(turned_w < flat_w);
    }

    #[test]
    fn test_x_rotation_narrows_height() {
        let capsule = Capsule::new(200.0, 80.0);
        let outline = capsule.outline();
        let flat = bounds(&Projection::default().project(&outline, 0.0, 0.0, (0.0, 0.0))).unwrap();
        let turned = bounds(&Projection::default().project(&outline, 40.0, 0.0, (0.0, 0.0))).unwrap();

        assert!(turned.1 .1 - turned.0 .1 < flat.1 .1 - flat.0 .1);
        // Width barely changes under rotation about the horizontal axis
        assert!(((turned.1 .0 - turned.0 .0) - (flat.1 .0 - flat.0 .0)).abs() < 20.0);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(bounds(&[]).is_none());
    }
}
