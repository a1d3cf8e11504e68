//! Sensor module - delivers tilt samples at a fixed rate
//!
//! This module provides:
//! - `TiltProvider` trait standing in for the platform motion API
//! - Providers: pointer-driven virtual device, LFO wobble, no sensor
//! - Latest-value slot shared between the sensor and UI threads
//! - `SensorSource`, which owns the background subscription

mod provider;
mod slot;
mod source;
mod wobble;

#[allow(unused_imports)]
pub use provider::{
    BoxedProvider, NoSensor, PointerHandle, PointerTilt, ProviderKind, SensorReading,
    TiltProvider,
};
pub use slot::TiltSlot;
#[allow(unused_imports)]
pub use source::{
    subscribe, Notify, SensorConfig, SensorError, SensorSource, SensorSubscription,
    SAMPLE_INTERVAL,
};
#[allow(unused_imports)]
pub use wobble::{Lfo, LfoWaveform, WobbleTilt};
