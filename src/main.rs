//! tiltglass - motion-reactive capsule widget
//!
//! A glassy capsule that leans, casts shadows and catches light as the device
//! it runs on is tilted. Tilt comes from a [`sensor::TiltProvider`] sampled on
//! a background thread; on the desktop the canvas itself can be dragged to
//! play the part of the device.
//!
//! ## Frame order
//! 1. Take the newest tilt sample, if any
//! 2. Queue MIDI edits
//! 3. Draw the panel and canvas from current state (panel widgets queue edits)
//! 4. Apply queued edits through the store, which clamps and notifies

use eframe::egui;

mod midi;
mod motion;
mod panel;
mod params;
mod render;
mod sensor;

use midi::MidiController;
use motion::MotionState;
use panel::{PanelAction, PanelState};
use params::{ParamChange, ParameterStore};
use render::Canvas;
use sensor::{ProviderKind, SensorConfig, SensorSource};

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting tiltglass");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("tiltglass"),
        ..Default::default()
    };

    eframe::run_native(
        "tiltglass",
        options,
        Box::new(|cc| Ok(Box::new(TiltApp::new(cc)))),
    )
}

/// Main application state
struct TiltApp {
    motion: MotionState,
    sensor: SensorSource,
    midi: MidiController,
    panel: PanelState,
    canvas: Canvas,
    show_settings: bool,
}

impl TiltApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut store = ParameterStore::new();
        let ctx = cc.egui_ctx.clone();
        store.subscribe(move |_: &ParamChange| ctx.request_repaint());

        let ctx = cc.egui_ctx.clone();
        let mut sensor = SensorSource::new(SensorConfig::default(), move || ctx.request_repaint());
        sensor.start();

        // CC input can arrive while nothing else is repainting
        let ctx = cc.egui_ctx.clone();
        let mut midi = MidiController::new();
        midi.set_notify(move || ctx.request_repaint());

        Self {
            motion: MotionState::new(store),
            sensor,
            midi,
            panel: PanelState::new(),
            canvas: Canvas::new(),
            show_settings: true,
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: PanelAction) {
        match action {
            PanelAction::SwitchProvider(kind) => self.sensor.switch(kind),
            PanelAction::CopyJson => {
                match serde_json::to_string_pretty(self.motion.store().params()) {
                    Ok(json) => {
                        ctx.copy_text(json);
                        log::info!("Copied parameters to clipboard");
                    }
                    Err(e) => log::warn!("Failed to serialize parameters: {}", e),
                }
            }
            PanelAction::ResetGroup(group) => {
                let n = self.motion.store_mut().reset(group.params());
                log::info!("Reset {} ({} changed)", group.name(), n);
            }
            PanelAction::ResetAll => {
                let n = self.motion.store_mut().reset_all();
                log::info!("Reset all parameters ({} changed)", n);
            }
        }
    }
}

impl eframe::App for TiltApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(tilt) = self.sensor.poll() {
            self.motion.set_tilt(tilt);
        }

        let midi_edits = self.midi.poll();
        self.panel.pending.extend(midi_edits);

        let mut actions = Vec::new();

        // Top panel
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("tiltglass");
                ui.separator();
                ui.toggle_value(&mut self.show_settings, "⚙ Settings");
                ui.separator();
                ui.label(&self.sensor.status);
            });
        });

        // Settings panel
        if self.show_settings {
            egui::SidePanel::left("settings_panel")
                .min_width(260.0)
                .show(ctx, |ui| {
                    actions.extend(panel::show(
                        ui,
                        &mut self.panel,
                        &self.motion,
                        &self.sensor,
                        &mut self.midi,
                    ));
                });
        }

        // Capsule canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let pointer = (self.sensor.kind() == ProviderKind::Pointer)
                .then(|| self.sensor.pointer());
            self.canvas.show(ui, &self.motion, pointer);
        });

        let pending = std::mem::take(&mut self.panel.pending);
        self.motion.store_mut().apply_all(pending);

        for action in actions {
            self.handle_action(ctx, action);
        }
    }
}

impl Drop for TiltApp {
    fn drop(&mut self) {
        self.sensor.stop();
        self.midi.disconnect();
    }
}
