//! Customization panel
//!
//! One tab per [`ParamGroup`]. Widgets never write to the store directly:
//! each edits a local copy of the current value and, when it changes, queues
//! a [`ParamEdit`]. The app applies the queue at the end of the frame.

use eframe::egui;

use crate::midi::MidiController;
use crate::motion::MotionState;
use crate::params::{ParamEdit, ParamGroup, ParamId, ParamValue, Rgba};
use crate::sensor::{ProviderKind, SensorSource};

/// Requests the panel can't fulfil itself
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelAction {
    SwitchProvider(ProviderKind),
    CopyJson,
    ResetGroup(ParamGroup),
    ResetAll,
}

#[derive(Default)]
pub struct PanelState {
    pub tab: ParamGroup,
    /// Edits waiting for the end of the frame
    pub pending: Vec<ParamEdit>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn show(
    ui: &mut egui::Ui,
    state: &mut PanelState,
    motion: &MotionState,
    sensor: &SensorSource,
    midi: &mut MidiController,
) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        for group in ParamGroup::ALL {
            ui.selectable_value(&mut state.tab, *group, group.name());
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        if state.tab == ParamGroup::Debug {
            debug_readout(ui, motion, sensor, &mut actions);
            ui.separator();
        }

        for id in state.tab.params() {
            if let Some(edit) = param_widget(ui, id, motion.store().get(id)) {
                state.pending.push(edit);
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(format!("Reset {}", state.tab.name())).clicked() {
                actions.push(PanelAction::ResetGroup(state.tab));
            }
            if ui.button("Reset all").clicked() {
                actions.push(PanelAction::ResetAll);
            }
        });

        if state.tab == ParamGroup::Debug {
            ui.separator();
            ui.collapsing("Parameters", |ui| param_table(ui, motion));
            if ui
                .button("Copy as JSON")
                .on_hover_text("Copy current parameters to the clipboard")
                .clicked()
            {
                actions.push(PanelAction::CopyJson);
            }
            ui.separator();
            ui.collapsing("MIDI", |ui| midi_section(ui, midi));
        }
    });

    actions
}

/// Draw the widget for one parameter. Returns an edit if the user changed it.
fn param_widget(ui: &mut egui::Ui, id: ParamId, current: ParamValue) -> Option<ParamEdit> {
    match current {
        ParamValue::Number(mut v) => {
            let (min, max) = id.range().unwrap_or((0.0, 1.0));
            ui.add(egui::Slider::new(&mut v, min..=max).text(id.name()))
                .changed()
                .then(|| ParamEdit::number(id, v))
        }
        ParamValue::Toggle(mut b) => ui
            .checkbox(&mut b, id.name())
            .changed()
            .then(|| ParamEdit::toggle(id, b)),
        ParamValue::Color(c) => {
            let mut rgba = c.to_array();
            ui.horizontal(|ui| {
                let changed = ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed();
                ui.label(id.name());
                changed
            })
            .inner
            .then(|| ParamEdit::new(id, ParamValue::Color(Rgba::from_array(rgba))))
        }
    }
}

fn debug_readout(
    ui: &mut egui::Ui,
    motion: &MotionState,
    sensor: &SensorSource,
    actions: &mut Vec<PanelAction>,
) {
    let tilt = motion.tilt();
    let derived = motion.derived();

    ui.label("Tilt");
    egui::Grid::new("tilt_readout").num_columns(2).show(ui, |ui| {
        ui.label("x");
        ui.monospace(format!("{:+.3}", tilt.x));
        ui.end_row();
        ui.label("y");
        ui.monospace(format!("{:+.3}", tilt.y));
        ui.end_row();
        ui.label("rotation X");
        ui.monospace(format!("{:+.1}°", derived.x_rotation_degrees));
        ui.end_row();
        ui.label("rotation Y");
        ui.monospace(format!("{:+.1}°", derived.y_rotation_degrees));
        ui.end_row();
    });

    ui.add_space(4.0);

    let mut kind = sensor.kind();
    egui::ComboBox::from_label("Sensor")
        .selected_text(kind.name())
        .show_ui(ui, |ui| {
            for k in ProviderKind::ALL {
                ui.selectable_value(&mut kind, *k, k.name());
            }
        });
    if kind != sensor.kind() {
        actions.push(PanelAction::SwitchProvider(kind));
    }
    let status_color = if sensor.is_active() {
        egui::Color32::LIGHT_GREEN
    } else {
        egui::Color32::GRAY
    };
    ui.colored_label(
        status_color,
        format!("{} · {} samples", sensor.status, sensor.samples_published()),
    );
}

/// Every parameter, read back through the store
fn param_table(ui: &mut egui::Ui, motion: &MotionState) {
    egui::Grid::new("param_table")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for id in ParamId::ALL {
                ui.label(id.name());
                ui.monospace(motion.store().get(*id).exact());
                ui.end_row();
            }
        });
    ui.add_space(4.0);
}

fn midi_section(ui: &mut egui::Ui, midi: &mut MidiController) {
    ui.horizontal(|ui| {
        let port_name = midi
            .ports
            .get(midi.selected_port)
            .cloned()
            .unwrap_or_else(|| "None".to_string());

        egui::ComboBox::from_id_salt("midi_port")
            .selected_text(port_name)
            .width(140.0)
            .show_ui(ui, |ui| {
                for (i, name) in midi.ports.iter().enumerate() {
                    ui.selectable_value(&mut midi.selected_port, i, name);
                }
            });

        if ui.button("↻").on_hover_text("Rescan ports").clicked() {
            midi.scan_ports();
        }
    });

    let label = if midi.is_connected() { "Disconnect" } else { "Connect" };
    if ui.button(label).clicked() {
        midi.toggle();
    }
    ui.small(&midi.status);

    ui.separator();

    let mut remove = None;
    let mut learn = None;
    for (i, mapping) in midi.mappings.iter().enumerate() {
        ui.horizontal(|ui| {
            if midi.learning == Some(i) {
                ui.colored_label(egui::Color32::YELLOW, "CC ?");
            } else {
                ui.monospace(format!("CC {:>3}", mapping.cc));
            }
            ui.label(mapping.param.name());
            if ui.small_button("Learn").clicked() {
                learn = Some(i);
            }
            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = learn {
        midi.start_learn(i);
    }
    if let Some(i) = remove {
        midi.remove_mapping(i);
    }

    let unmapped = midi.unmapped_params();
    if !unmapped.is_empty() {
        ui.menu_button("+ Add mapping", |ui| {
            for param in unmapped {
                if ui.button(param.name()).clicked() {
                    let index = midi.mappings.len();
                    if midi.add_mapping(0, param) {
                        midi.start_learn(index);
                    }
                    ui.close_menu();
                }
            }
        });
    }
}
