//! Synthetic tilt from low-frequency oscillators
//!
//! Traces a slow Lissajous wobble so the capsule moves without a real
//! accelerometer or a hand on the mouse.

use std::f32::consts::TAU;
use std::time::Duration;

use super::provider::{SensorReading, TiltProvider};

/// LFO waveform shapes
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LfoWaveform {
    /// Smooth sine wave
    Sine,
    /// Linear triangle wave
    Triangle,
}

impl LfoWaveform {
    /// Sample the waveform at phase (0.0 to 1.0)
    /// Returns value in range -1.0 to 1.0
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            LfoWaveform::Sine => (phase * TAU).sin(),

            LfoWaveform::Triangle => {
                let p = phase * 4.0;
                if p < 1.0 {
                    p
                } else if p < 3.0 {
                    2.0 - p
                } else {
                    p - 4.0
                }
            }
        }
    }
}

/// Low Frequency Oscillator
#[derive(Clone, Debug)]
pub struct Lfo {
    /// Oscillation frequency in Hz
    pub frequency: f32,
    pub waveform: LfoWaveform,
    /// Peak output, the LFO swings between -amplitude and +amplitude
    pub amplitude: f32,
    /// Phase offset (0.0 to 1.0)
    pub phase_offset: f32,
}

impl Lfo {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            waveform: LfoWaveform::Sine,
            amplitude,
            phase_offset: 0.0,
        }
    }

    pub fn waveform(mut self, waveform: LfoWaveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn phase(mut self, offset: f32) -> Self {
        self.phase_offset = offset;
        self
    }

    /// Output at `time` seconds
    pub fn sample(&self, time: f32) -> f32 {
        let phase = (time * self.frequency + self.phase_offset).rem_euclid(1.0);
        self.waveform.sample(phase) * self.amplitude
    }
}

/// Tilt provider driven by two LFOs
pub struct WobbleTilt {
    x: Lfo,
    y: Lfo,
}

impl Default for WobbleTilt {
    fn default() -> Self {
        // 3:2 frequency ratio gives a slow figure-of-eight sweep; the
        // triangle on Y makes the nod steady rather than easing at the ends
        Self::new(
            Lfo::new(0.15, 0.6),
            Lfo::new(0.10, 0.45)
                .waveform(LfoWaveform::Triangle)
                .phase(0.25),
        )
    }
}

impl WobbleTilt {
    pub fn new(x: Lfo, y: Lfo) -> Self {
        Self { x, y }
    }
}

impl TiltProvider for WobbleTilt {
    fn name(&self) -> &str {
        "Wobble"
    }

    fn read(&mut self, elapsed: Duration) -> Option<SensorReading> {
        let t = elapsed.as_secs_f32();
        Some(SensorReading {
            acceleration_x: self.x.sample(t) as f64,
            acceleration_y: self.y.sample(t) as f64,
        })
    }
}
