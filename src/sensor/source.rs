//! Sensor source - samples a tilt provider on a background thread
//!
//! The background thread only builds immutable samples and drops them into a
//! [`TiltSlot`]. It never touches UI state; the UI thread polls the slot once
//! per frame.
//!
//! Lifetime is owned by the consumer through [`SensorSubscription`]:
//! dropping the handle stops and joins the thread, after which no further
//! sample is published.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

use super::provider::{BoxedProvider, PointerHandle, ProviderKind};
use super::slot::TiltSlot;
use crate::motion::TiltSample;

/// One reading every 33 ms, roughly 30 Hz
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(33);

/// Callback fired after each published sample (typically a repaint request)
pub type Notify = Arc<dyn Fn() + Send + Sync>;

#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Tilt sensor unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to spawn sensor thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Sensor configuration
#[derive(Clone, Debug)]
pub struct SensorConfig {
    /// Time between readings
    pub interval: Duration,
    /// Which provider to start with
    pub provider: ProviderKind,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            interval: SAMPLE_INTERVAL,
            provider: ProviderKind::Pointer,
        }
    }
}

/// Handle to a running sensor thread
pub struct SensorSubscription {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    name: String,
}

impl SensorSubscription {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.stop.store(true, Ordering::Release);
            thread.thread().unpark();
            if thread.join().is_err() {
                log::error!("Sensor thread '{}' panicked", self.name);
            }
            log::info!("Sensor stopped: {}", self.name);
        }
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Subscribe to `provider` at a fixed interval.
///
/// Each reading is published to `slot` and then `notify` fires. Fails with
/// [`SensorError::Unavailable`] if the provider has no sensor; no thread is
/// started in that case.
pub fn subscribe(
    mut provider: BoxedProvider,
    interval: Duration,
    slot: TiltSlot,
    notify: Notify,
) -> Result<SensorSubscription, SensorError> {
    let name = provider.name().to_string();
    if !provider.is_available() {
        return Err(SensorError::Unavailable(name));
    }

    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name(format!("tilt-{}", name.to_lowercase()))
        .spawn(move || {
            let started = Instant::now();
            let mut next_tick = started;

            while !thread_stop.load(Ordering::Acquire) {
                if let Some(reading) = provider.read(started.elapsed()) {
                    // Shutdown may have been requested while reading
                    if thread_stop.load(Ordering::Acquire) {
                        break;
                    }
                    slot.publish(TiltSample::from_acceleration(
                        reading.acceleration_x,
                        reading.acceleration_y,
                    ));
                    notify();
                }

                next_tick += interval;
                let now = Instant::now();
                if next_tick > now {
                    // Parked rather than slept so shutdown can wake us early
                    thread::park_timeout(next_tick - now);
                } else {
                    // Fell behind: skip missed ticks instead of bursting
                    next_tick = now;
                }
            }
        })?;

    log::info!("Sensor started: {} every {:?}", name, interval);

    Ok(SensorSubscription {
        stop,
        thread: Some(thread),
        name,
    })
}

/// Owns the slot, the active subscription and the virtual pointer device
pub struct SensorSource {
    config: SensorConfig,
    slot: TiltSlot,
    pointer: PointerHandle,
    subscription: Option<SensorSubscription>,
    notify: Notify,
    kind: ProviderKind,

    /// Status message
    pub status: String,
}

impl SensorSource {
    pub fn new<F>(config: SensorConfig, notify: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let kind = config.provider;
        Self {
            config,
            slot: TiltSlot::new(),
            pointer: PointerHandle::new(),
            subscription: None,
            notify: Arc::new(notify),
            kind,
            status: "Stopped".to_string(),
        }
    }

    /// Start sampling the configured provider.
    ///
    /// An unavailable sensor is not an error for the caller: tilt simply
    /// stays where it was.
    pub fn start(&mut self) {
        self.stop();

        let provider = self.kind.build(&self.pointer);
        match subscribe(
            provider,
            self.config.interval,
            self.slot.clone(),
            Arc::clone(&self.notify),
        ) {
            Ok(subscription) => {
                self.status = format!("Sensor: {}", subscription.name());
                self.subscription = Some(subscription);
            }
            Err(e) => {
                log::info!("{}", e);
                self.status = "Sensor unavailable".to_string();
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.stop();
            self.status = "Stopped".to_string();
        }
    }

    /// Tear down the current provider and start another
    pub fn switch(&mut self, kind: ProviderKind) {
        if kind == self.kind && self.subscription.is_some() {
            return;
        }
        log::info!("Switching sensor to {}", kind.name());
        self.kind = kind;
        self.start();
    }

    /// Newest sample since the last poll, if any
    pub fn poll(&self) -> Option<TiltSample> {
        self.slot.take()
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn pointer(&self) -> &PointerHandle {
        &self.pointer
    }

    pub fn is_active(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.is_running())
    }

    /// Samples published since launch, across all providers
    pub fn samples_published(&self) -> u64 {
        self.slot.published()
    }
}
