//! Control panel and Add Mass dialog drawn with egui
//!
//! Widgets only collect [`UiAction`]s; the app applies them to the model
//! after the egui pass.

use egui::{Color32, Context, RichText};
use inertia_sim::constants::TORQUE_RANGE;

/// A user request coming out of the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    AddMass { mass: String, position: String },
    RemoveMass,
    SetTorque(f64),
    Start,
}

/// Read-only values the panel displays
pub struct PanelStatus<'a> {
    pub inertia_label: &'a str,
    pub mass_count: usize,
    pub running: bool,
    pub frame: Option<u32>,
    pub angular_velocity: f64,
}

#[derive(Debug, Default)]
struct AddMassDialog {
    open: bool,
    mass: String,
    position: String,
    error: Option<String>,
}

#[derive(Debug)]
pub struct ControlsView {
    torque: f64,
    dialog: AddMassDialog,
}

impl ControlsView {
    pub fn new(torque: f64) -> Self {
        Self {
            torque,
            dialog: AddMassDialog::default(),
        }
    }

    /// Close the dialog after its values were accepted
    pub fn mass_accepted(&mut self) {
        self.dialog = AddMassDialog::default();
    }

    /// Keep the dialog open and show why the values were refused
    pub fn mass_rejected(&mut self, reason: String) {
        self.dialog.open = true;
        self.dialog.error = Some(reason);
    }

    pub fn draw(&mut self, ctx: &Context, status: &PanelStatus<'_>) -> Vec<UiAction> {
        let mut actions = Vec::new();

        egui::SidePanel::left("controls_panel")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("Controls").color(Color32::LIGHT_BLUE));
                ui.separator();

                ui.label(RichText::new(status.inertia_label).strong());
                ui.label(format!("Masses: {}", status.mass_count));
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    if ui.button("Add Mass").clicked() {
                        self.dialog.open = true;
                    }
                    if ui.button("Remove Mass").clicked() {
                        actions.push(UiAction::RemoveMass);
                    }
                });

                ui.add_space(6.0);
                ui.label("Driving Torque (Nm):");
                let slider = egui::Slider::new(&mut self.torque, TORQUE_RANGE).step_by(1.0);
                if ui.add(slider).changed() {
                    actions.push(UiAction::SetTorque(self.torque));
                }

                ui.add_space(6.0);
                if ui.button("Start Simulation").clicked() {
                    actions.push(UiAction::Start);
                }

                ui.separator();
                if status.running {
                    ui.label(RichText::new("RUNNING").color(Color32::GREEN));
                } else {
                    ui.label(RichText::new("IDLE").color(Color32::YELLOW));
                }
                if let Some(frame) = status.frame {
                    ui.label(format!("Frame: {}", frame));
                }
                ui.label(format!("ω = {:.4} rad/s", status.angular_velocity));
            });

        if self.dialog.open {
            let mut open = true;
            egui::Window::new("Add Mass")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label("Enter mass (kg):");
                    ui.text_edit_singleline(&mut self.dialog.mass);
                    ui.label("Enter position from pivot (m):");
                    ui.text_edit_singleline(&mut self.dialog.position);

                    if let Some(error) = &self.dialog.error {
                        ui.label(RichText::new(error).color(Color32::LIGHT_RED));
                    }

                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            actions.push(UiAction::AddMass {
                                mass: self.dialog.mass.clone(),
                                position: self.dialog.position.clone(),
                            });
                        }
                        if ui.button("Cancel").clicked() {
                            self.dialog = AddMassDialog::default();
                        }
                    });
                });
            if !open {
                self.dialog = AddMassDialog::default();
            }
        }

        actions
    }
}
