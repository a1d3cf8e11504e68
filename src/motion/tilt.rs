//! Tilt sample - the latest 2-axis reading from the sensor

/// Gravity-derived tilt on two axes.
///
/// Roughly -1.0 to 1.0 when the device is handled normally, but nothing
/// bounds it. `(0, 0)` is a device held perfectly level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
}

impl TiltSample {
    pub const LEVEL: TiltSample = TiltSample { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Build a sample from raw accelerometer components
    pub fn from_acceleration(acceleration_x: f64, acceleration_y: f64) -> Self {
        Self::new(acceleration_x as f32, acceleration_y as f32)
    }

    /// Multiply both axes by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}
