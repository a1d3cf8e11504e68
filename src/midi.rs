//! MIDI input handling
//!
//! Receives MIDI CC messages and maps them to visual parameters.
//! The MIDI callback only writes to shared atomics and wakes the UI; the UI
//! thread polls them each frame and turns them into [`ParamEdit`]s, which go
//! through the same clamping edit boundary as the panel's widgets.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use midir::{MidiInput, MidiInputConnection};

use crate::params::{ParamEdit, ParamId, ParamKind, ParamValue};
use crate::sensor::Notify;

/// Map a MIDI CC value (0-127) onto a parameter.
///
/// Numbers span their declared range, toggles switch at the midpoint.
/// Colors cannot be driven by a single controller.
pub fn map_value(param: ParamId, cc_value: u8) -> Option<ParamValue> {
    let cc_value = cc_value.min(127);
    match param.kind() {
        ParamKind::Number => {
            let (min, max) = param.range()?;
            let t = cc_value as f32 / 127.0;
            Some(ParamValue::Number(min + t * (max - min)))
        }
        ParamKind::Toggle => Some(ParamValue::Toggle(cc_value >= 64)),
        ParamKind::Color => None,
    }
}

/// Parameters a CC can drive
pub fn mappable_params() -> impl Iterator<Item = ParamId> {
    ParamId::ALL
        .iter()
        .copied()
        .filter(|p| p.kind() != ParamKind::Color)
}

/// A single CC-to-parameter mapping
#[derive(Debug, Clone, PartialEq)]
pub struct MidiMapping {
    pub cc: u8,
    pub param: ParamId,
}

/// Shared CC values written by the MIDI callback, read by the UI thread.
/// Index = CC number (0-127), value = last received CC value.
#[derive(Clone)]
struct SharedCcValues {
    values: Arc<[AtomicU8; 128]>,
    /// Tracks which CCs have been received since last poll.
    changed: Arc<[AtomicU8; 128]>,
}

impl SharedCcValues {
    fn new() -> Self {
        Self {
            values: Arc::new(std::array::from_fn(|_| AtomicU8::new(0))),
            changed: Arc::new(std::array::from_fn(|_| AtomicU8::new(0))),
        }
    }

    /// Called from MIDI callback thread
    fn set(&self, cc: u8, value: u8) {
        let cc = (cc & 0x7F) as usize;
        self.values[cc].store(value, Ordering::Relaxed);
        self.changed[cc].store(1, Ordering::Release);
    }

    /// Read a CC value and clear its changed flag. Returns Some if changed since last poll.
    fn poll(&self, cc: u8) -> Option<u8> {
        let cc = (cc & 0x7F) as usize;
        if self.changed[cc].swap(0, Ordering::Acquire) != 0 {
            Some(self.values[cc].load(Ordering::Relaxed))
        } else {
            None
        }
    }
}

/// Parse a raw MIDI message, returning `(cc, value)` for control changes
fn parse_cc(message: &[u8]) -> Option<(u8, u8)> {
    // [0xB0 | channel, cc_number, value]
    if message.len() == 3 && (message[0] & 0xF0) == 0xB0 {
        Some((message[1] & 0x7F, message[2] & 0x7F))
    } else {
        None
    }
}

/// Handle one raw message on the MIDI thread: store the CC, then wake the UI
fn receive(cc_values: &SharedCcValues, notify: Option<&Notify>, message: &[u8]) {
    if let Some((cc, value)) = parse_cc(message) {
        cc_values.set(cc, value);
        if let Some(notify) = notify {
            notify();
        }
    }
}

/// MIDI input controller
pub struct MidiController {
    /// Available MIDI port names (refreshed on scan)
    pub ports: Vec<String>,

    /// Currently selected port index (for UI combo box)
    pub selected_port: usize,

    /// Active connection (None if disconnected)
    connection: Option<MidiInputConnection<()>>,

    /// Shared CC values between MIDI thread and UI
    cc_values: SharedCcValues,

    /// CC-to-parameter mappings for this session
    pub mappings: Vec<MidiMapping>,

    /// Status message
    pub status: String,

    /// Mapping index waiting for a CC (MIDI learn mode)
    pub learning: Option<usize>,

    /// Fired from the MIDI thread after each CC (typically a repaint request)
    notify: Option<Notify>,
}

impl Default for MidiController {
    fn default() -> Self {
        Self {
            ports: Vec::new(),
            selected_port: 0,
            connection: None,
            cc_values: SharedCcValues::new(),
            mappings: Vec::new(),
            status: "Disconnected".to_string(),
            learning: None,
            notify: None,
        }
    }
}

impl MidiController {
    pub fn new() -> Self {
        let mut controller = Self::default();
        controller.scan_ports();
        controller
    }

    /// Set the callback fired for every received CC. Takes effect on the next connect.
    pub fn set_notify<F>(&mut self, notify: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(notify));
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Scan for available MIDI input ports
    pub fn scan_ports(&mut self) {
        self.ports.clear();
        match MidiInput::new("tiltglass-scan") {
            Ok(midi_in) => {
                for port in midi_in.ports().iter() {
                    let name = midi_in
                        .port_name(port)
                        .unwrap_or_else(|_| "Unknown".to_string());
                    self.ports.push(name);
                }
                if self.ports.is_empty() {
                    self.status = "No MIDI devices found".to_string();
                }
            }
            Err(e) => {
                self.status = format!("MIDI init error: {}", e);
                log::warn!("MIDI init error: {}", e);
            }
        }
    }

    /// Connect to the currently selected MIDI port
    pub fn connect(&mut self) {
        if self.is_connected() {
            return;
        }

        let midi_in = match MidiInput::new("tiltglass") {
            Ok(m) => m,
            Err(e) => {
                self.status = format!("MIDI init error: {}", e);
                return;
            }
        };

        let ports = midi_in.ports();
        let port = match ports.get(self.selected_port) {
            Some(p) => p,
            None => {
                self.status = "Port not found".to_string();
                return;
            }
        };

        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let cc_values = self.cc_values.clone();
        let notify = self.notify.clone();

        match midi_in.connect(
            port,
            "tiltglass-input",
            move |_timestamp, message, _| receive(&cc_values, notify.as_ref(), message),
            (),
        ) {
            Ok(conn) => {
                self.connection = Some(conn);
                self.status = format!("Connected: {}", port_name);
                log::info!("MIDI connected: {}", port_name);
            }
            Err(e) => {
                self.status = format!("Connect error: {}", e);
                log::error!("MIDI connect error: {}", e);
            }
        }
    }

    /// Disconnect from the current MIDI port
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            log::info!("MIDI disconnected");
        }
        self.learning = None;
        self.status = "Disconnected".to_string();
    }

    /// Toggle connection state
    pub fn toggle(&mut self) {
        if self.is_connected() {
            self.disconnect();
        } else {
            self.connect();
        }
    }

    /// Poll for changed CC values and return parameter edits.
    /// Call this once per frame from the UI thread.
    pub fn poll(&mut self) -> Vec<ParamEdit> {
        let mut edits = Vec::new();

        // Learn mode: the first CC received is assigned to the pending mapping
        if let Some(mapping_idx) = self.learning {
            for cc in 0..128u8 {
                if self.cc_values.poll(cc).is_some() {
                    if let Some(mapping) = self.mappings.get_mut(mapping_idx) {
                        mapping.cc = cc;
                        log::info!("MIDI learn: CC {} -> {}", cc, mapping.param);
                    }
                    self.learning = None;
                    break;
                }
            }
            return edits;
        }

        for mapping in &self.mappings {
            if let Some(cc_value) = self.cc_values.poll(mapping.cc) {
                if let Some(value) = map_value(mapping.param, cc_value) {
                    edits.push(ParamEdit::new(mapping.param, value));
                }
            }
        }

        edits
    }

    /// Add a new mapping. Color parameters are refused.
    pub fn add_mapping(&mut self, cc: u8, param: ParamId) -> bool {
        if param.kind() == ParamKind::Color {
            return false;
        }
        self.mappings.push(MidiMapping { cc: cc & 0x7F, param });
        true
    }

    /// Remove a mapping by index
    pub fn remove_mapping(&mut self, index: usize) {
        if index < self.mappings.len() {
            self.mappings.remove(index);
            match self.learning {
                Some(l) if l == index => self.learning = None,
                Some(l) if l > index => self.learning = Some(l - 1),
                _ => {}
            }
        }
    }

    /// Start MIDI learn mode for a mapping
    pub fn start_learn(&mut self, mapping_index: usize) {
        if mapping_index < self.mappings.len() {
            self.learning = Some(mapping_index);
        }
    }

    pub fn cancel_learn(&mut self) {
        self.learning = None;
    }

    /// Mappable parameters not yet mapped
    pub fn unmapped_params(&self) -> Vec<ParamId> {
        mappable_params()
            .filter(|p| !self.mappings.iter().any(|m| m.param == *p))
            .collect()
    }

    #[cfg(test)]
    fn inject(&self, message: &[u8]) {
        receive(&self.cc_values, self.notify.as_ref(), message);
    }
}
