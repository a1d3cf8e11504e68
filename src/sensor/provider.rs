//! Tilt providers - where raw readings come from
//!
//! A provider stands in for the platform motion API. Desktop machines have
//! no accelerometer, so besides the trait this module ships a pointer-driven
//! virtual device and a provider that is simply unavailable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::slot::{pack, unpack};
use super::wobble::WobbleTilt;
use crate::motion::TiltSample;

/// One raw reading as the platform delivers it
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorReading {
    pub acceleration_x: f64,
    pub acceleration_y: f64,
}

/// A source of tilt readings.
///
/// `read` is called from the sensor thread at the sampling interval with the
/// time elapsed since the subscription started. Returning `None` skips that
/// tick.
pub trait TiltProvider: Send {
    fn name(&self) -> &str;

    /// Whether the device can deliver readings at all
    fn is_available(&self) -> bool {
        true
    }

    fn read(&mut self, elapsed: Duration) -> Option<SensorReading>;
}

/// A boxed provider for dynamic dispatch
pub type BoxedProvider = Box<dyn TiltProvider>;

/// UI-side handle for steering the pointer-driven virtual device.
///
/// Cloning shares the same device attitude.
#[derive(Clone)]
pub struct PointerHandle {
    attitude: Arc<AtomicU64>,
}

impl Default for PointerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerHandle {
    pub fn new() -> Self {
        Self {
            attitude: Arc::new(AtomicU64::new(pack(TiltSample::LEVEL))),
        }
    }

    /// Set the virtual tilt. Each axis is clamped to -1.0..=1.0.
    pub fn set(&self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let bits = pack(TiltSample::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)));
        self.attitude.store(bits, Ordering::Relaxed);
    }

    /// Put the virtual device back down flat
    pub fn release(&self) {
        self.set(0.0, 0.0);
    }

    pub fn get(&self) -> (f32, f32) {
        let sample = unpack(self.attitude.load(Ordering::Relaxed));
        (sample.x, sample.y)
    }

    /// A provider that samples this handle
    pub fn provider(&self) -> PointerTilt {
        PointerTilt {
            handle: self.clone(),
        }
    }
}

/// Virtual device whose attitude follows a drag on the canvas
pub struct PointerTilt {
    handle: PointerHandle,
}

impl TiltProvider for PointerTilt {
    fn name(&self) -> &str {
        "Pointer"
    }

    fn read(&mut self, _elapsed: Duration) -> Option<SensorReading> {
        let (x, y) = self.handle.get();
        Some(SensorReading {
            acceleration_x: x as f64,
            acceleration_y: y as f64,
        })
    }
}

/// A device without a motion sensor
pub struct NoSensor;

impl TiltProvider for NoSensor {
    fn name(&self) -> &str {
        "None"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn read(&mut self, _elapsed: Duration) -> Option<SensorReading> {
        None
    }
}

/// Selectable provider types
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ProviderKind {
    #[default]
    Pointer,
    Wobble,
    None,
}

impl ProviderKind {
    pub const ALL: &[ProviderKind] = &[Self::Pointer, Self::Wobble, Self::None];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pointer => "Pointer (drag canvas)",
            Self::Wobble => "Wobble",
            Self::None => "No sensor",
        }
    }

    /// Build a provider of this kind; pointer providers sample `pointer`
    pub fn build(&self, pointer: &PointerHandle) -> BoxedProvider {
        match self {
            Self::Pointer => Box::new(pointer.provider()),
            Self::Wobble => Box::new(WobbleTilt::default()),
            Self::None => Box::new(NoSensor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_clamps() {
        let handle = PointerHandle::new();
        handle.set(2.0, -0.25);
        assert_eq!(handle.get(), (1.0, -0.25));

        handle.set(f32::NAN, 0.5);
        assert_eq!(handle.get(), (1.0, -0.25));

        handle.release();
        assert_eq!(handle.get(), (0.0, 0.0));
    }

    #[test]
    fn test_pointer_provider_reads_handle() {
        let handle = PointerHandle::new();
        let mut provider = handle.provider();
        handle.set(0.5, -0.75);

        let reading = provider.read(Duration::ZERO).unwrap();
        assert_eq!(reading.acceleration_x, 0.5);
        assert_eq!(reading.acceleration_y, -0.75);
    }

    #[test]
    fn test_no_sensor() {
        let mut provider = ProviderKind::None.build(&PointerHandle::new());
        assert!(!provider.is_available());
        assert!(provider.read(Duration::from_secs(1)).is_none());
    }
}
