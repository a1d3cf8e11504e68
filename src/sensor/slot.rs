//! Latest-value slot for sharing tilt between the sensor and UI threads
//!
//! The sensor thread publishes, the UI thread takes. There is no queue:
//! a new sample overwrites the previous one, so a slow UI simply skips
//! intermediate readings.
//!
//! ## Design Notes
//!
//! Both axes are packed into one `AtomicU64` (two `f32` bit patterns) so a
//! reader can never see X from one sample and Y from the next.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::motion::TiltSample;

pub(super) fn pack(sample: TiltSample) -> u64 {
    ((sample.x.to_bits() as u64) << 32) | sample.y.to_bits() as u64
}

pub(super) fn unpack(bits: u64) -> TiltSample {
    TiltSample::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

struct SlotInner {
    /// Packed x/y of the newest sample
    value: AtomicU64,
    /// Set on publish, cleared on take
    fresh: AtomicBool,
    /// Samples published since creation
    published: AtomicU64,
}

/// Shared single-sample mailbox. Cloning shares the same slot.
#[derive(Clone)]
pub struct TiltSlot {
    inner: Arc<SlotInner>,
}

impl Default for TiltSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TiltSlot {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SlotInner {
                value: AtomicU64::new(pack(TiltSample::LEVEL)),
                fresh: AtomicBool::new(false),
                published: AtomicU64::new(0),
            }),
        }
    }

    /// Called from the sensor thread
    pub fn publish(&self, sample: TiltSample) {
        self.inner.value.store(pack(sample), Ordering::Relaxed);
        self.inner.published.fetch_add(1, Ordering::Relaxed);
        self.inner.fresh.store(true, Ordering::Release);
    }

    /// Newest sample if one arrived since the last take
    pub fn take(&self) -> Option<TiltSample> {
        if self.inner.fresh.swap(false, Ordering::Acquire) {
            Some(unpack(self.inner.value.load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    /// Total samples published, including ones that were overwritten
    pub fn published(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }
}
