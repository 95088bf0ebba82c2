use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowOccluded};
use tracing::info;

use crate::config::VISIBILITY_THRESHOLD;

/// INACTIVE → ACTIVE, terminal. The simulation schedule starts running on
/// the first visibility report at or above the threshold, exactly once;
/// later reports are ignored no matter how visibility toggles.
#[derive(Resource, Default, Debug)]
pub struct ActivationGate {
    active: bool,
}

impl ActivationGate {
    /// Feed one visibility report (0.0 = hidden, 1.0 = fully visible).
    /// Returns true exactly once, on the activating report.
    pub fn observe(&mut self, visible_fraction: f32) -> bool {
        if self.active {
            return false;
        }
        if visible_fraction >= VISIBILITY_THRESHOLD {
            self.active = true;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Run condition for the fixed-timestep simulation systems.
pub fn simulation_active(gate: Res<ActivationGate>) -> bool {
    gate.is_active()
}

/// Watch the window's visibility and open the gate on the first
/// sufficient report.
pub fn observe_visibility(
    mut events: MessageReader<WindowOccluded>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gate: ResMut<ActivationGate>,
) {
    if gate.is_active() {
        events.clear();
        return;
    }

    for event in events.read() {
        let fraction = if event.occluded { 0.0 } else { 1.0 };
        if gate.observe(fraction) {
            info!("window visible, starting the simulation");
            return;
        }
    }

    // Occlusion reports are platform dependent; a window that is up and
    // marked visible counts as fully visible.
    if let Ok(window) = windows.single() {
        if window.visible && gate.observe(1.0) {
            info!("window visible, starting the simulation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_opens_at_the_threshold() {
        let mut gate = ActivationGate::default();
        assert!(!gate.observe(0.0));
        assert!(!gate.observe(0.05));
        assert!(!gate.is_active());
        assert!(gate.observe(VISIBILITY_THRESHOLD));
        assert!(gate.is_active());
    }

    #[test]
    fn gate_fires_exactly_once_under_toggling() {
        let mut gate = ActivationGate::default();
        let mut fired = 0;
        for fraction in [1.0, 0.0, 1.0, 0.0, 1.0] {
            if gate.observe(fraction) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(gate.is_active());
    }

    #[test]
    fn active_is_terminal() {
        let mut gate = ActivationGate::default();
        gate.observe(1.0);
        assert!(!gate.observe(0.0));
        assert!(gate.is_active());
    }
}
