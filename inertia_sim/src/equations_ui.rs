//! Equations sidebar UI for the rotating rod
//!
//! Displays relevant physics equations using egui.

use egui::{Color32, Context, RichText};

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equations sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

pub const ROTATION_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Moment of Inertia",
        formula: "I = Σ mᵢ·rᵢ²",
        description: "Point masses at distance r from the pivot",
    },
    Equation {
        name: "Newton's Second Law (rotation)",
        formula: "α = τ / I",
        description: "Angular acceleration from driving torque",
    },
    Equation {
        name: "Angular Velocity Update",
        formula: "ω ← ω + α·Δt",
        description: "Applied once per frame, Δt = 0.1 s",
    },
    Equation {
        name: "Rod Angle",
        formula: "θ = ω·n·Δt",
        description: "Angle at frame n from current velocity",
    },
    Equation {
        name: "Rotation",
        formula: "x' = x·cosθ − y·sinθ\ny' = x·sinθ + y·cosθ",
        description: "Counterclockwise about the pivot",
    },
];

pub const ROTATION_VARIABLES: &[(&str, &str)] = &[
    ("I", "Moment of inertia (kg·m²)"),
    ("m", "Point mass (kg)"),
    ("r", "Offset from pivot (m)"),
    ("τ", "Driving torque (N·m)"),
    ("α", "Angular acceleration (rad/s²)"),
    ("ω", "Angular velocity (rad/s)"),
    ("θ", "Rod angle (rad)"),
    ("n", "Frame index (0-199)"),
];
