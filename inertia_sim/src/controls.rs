//! Control-panel contract: add/remove masses, torque slider, start button,
//! and the moment-of-inertia label shown after every mass-list change.

use crate::error::{SimError, SimResult};
use crate::physics::{Mass, PhysicsModel};
use crate::simulation::SimulationController;

/// Label text before the first mass-list change
pub const INERTIA_LABEL_PENDING: &str = "Moment of Inertia: Calculating...";

/// "Moment of Inertia: 8.75 kg·m²"
pub fn inertia_label(inertia: f64) -> String {
    format!("Moment of Inertia: {:.2} kg·m²", inertia)
}

fn parse_number(field: &'static str, text: &str) -> SimResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SimError::InvalidInput {
            field,
            value: text.to_string(),
        }),
    }
}

/// Parse the two fields of the add-mass dialog
pub fn parse_mass_input(mass: &str, position: &str) -> SimResult<Mass> {
    let mass = parse_number("mass", mass)?;
    let position = parse_number("position", position)?;
    if mass <= 0.0 {
        return Err(SimError::NonPositiveMass(mass));
    }
    Ok(Mass::new(mass, position))
}

/// Routes control-surface events into the model and controller and keeps
/// the inertia label current.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    inertia_label: String,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            inertia_label: INERTIA_LABEL_PENDING.to_string(),
        }
    }

    pub fn inertia_label(&self) -> &str {
        &self.inertia_label
    }

    fn refresh_label(&mut self, model: &PhysicsModel) {
        self.inertia_label = inertia_label(model.moment_of_inertia());
    }

    /// Nothing is appended when either field is rejected.
    pub fn on_add_mass(
        &mut self,
        model: &mut PhysicsModel,
        mass: &str,
        position: &str,
    ) -> SimResult<()> {
        let parsed = parse_mass_input(mass, position).map_err(|err| {
            log::warn!("add mass rejected: {}", err);
            err
        })?;
        model.add_mass(parsed.mass, parsed.position);
        self.refresh_label(model);
        Ok(())
    }

    pub fn on_remove_mass(&mut self, model: &mut PhysicsModel) {
        model.remove_mass();
        self.refresh_label(model);
    }

    pub fn on_torque_change(&mut self, model: &mut PhysicsModel, torque: f64) {
        log::debug!("torque set to {} N·m", torque);
        model.set_torque(torque);
    }

    pub fn on_start(&mut self, controller: &mut SimulationController, model: &mut PhysicsModel) {
        controller.start(model);
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_label_format() {
        assert_eq!(inertia_label(8.75), "Moment of Inertia: 8.75 kg·m²");
        assert_eq!(inertia_label(0.0), "Moment of Inertia: 0.00 kg·m²");
        assert_eq!(inertia_label(1.0 / 3.0), "Moment of Inertia: 0.33 kg·m²");
    }

    #[test]
    fn test_parse_accepts_signed_and_padded_numbers() {
        assert_eq!(parse_mass_input(" 2.5 ", "-0.75"), Ok(Mass::new(2.5, -0.75)));
        assert_eq!(parse_mass_input("1", "0"), Ok(Mass::new(1.0, 0.0)));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            parse_mass_input("heavy", "1"),
            Err(SimError::InvalidInput {
                field: "mass",
                value: "heavy".to_string()
            })
        );
        assert!(matches!(
            parse_mass_input("1", ""),
            Err(SimError::InvalidInput { field: "position", .. })
        ));
        assert!(matches!(
            parse_mass_input("NaN", "1"),
            Err(SimError::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_mass_input("1", "inf"),
            Err(SimError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_positive_mass() {
        assert_eq!(parse_mass_input("0", "1"), Err(SimError::NonPositiveMass(0.0)));
        assert_eq!(parse_mass_input("-2", "1"), Err(SimError::NonPositiveMass(-2.0)));
    }

    #[test]
    fn test_rejected_input_leaves_model_untouched() {
        let mut model = PhysicsModel::default();
        let mut panel = ControlPanel::new();
        assert!(panel.on_add_mass(&mut model, "x", "1").is_err());
        assert_eq!(model.masses().len(), 2);
        assert_eq!(panel.inertia_label(), INERTIA_LABEL_PENDING);
    }

    #[test]
    fn test_label_tracks_mass_list() {
        let mut model = PhysicsModel::new(SimConfig::default());
        let mut panel = ControlPanel::new();

        panel.on_add_mass(&mut model, "2", "1").unwrap();
        assert_eq!(panel.inertia_label(), "Moment of Inertia: 2.00 kg·m²");

        panel.on_add_mass(&mut model, "3", "1.5").unwrap();
        assert_eq!(panel.inertia_label(), "Moment of Inertia: 8.75 kg·m²");

        panel.on_remove_mass(&mut model);
        panel.on_remove_mass(&mut model);
        panel.on_remove_mass(&mut model);
        assert_eq!(panel.inertia_label(), "Moment of Inertia: 0.00 kg·m²");
    }

    #[test]
    fn test_torque_and_start_events() {
        let mut model = PhysicsModel::default();
        let mut controller = SimulationController::for_model(&model);
        let mut panel = ControlPanel::new();

        panel.on_torque_change(&mut model, 7.5);
        assert_eq!(model.torque(), 7.5);

        panel.on_start(&mut controller, &mut model);
        assert!(controller.is_running());
    }
}
