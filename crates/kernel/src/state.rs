use crate::light::LightRig;
use crate::rotation::RotationController;
use crate::stats::FrameStats;
use gimbal_common::DemoConfig;
use gimbal_input::{Action, ActionState};
use glam::Vec3;

/// Everything the demo recomputes or re-applies each frame.
#[derive(Debug, Clone, Default)]
pub struct DemoState {
    pub rotation: RotationController,
    pub light: LightRig,
    pub stats: FrameStats,
    /// The shadow map is shown full screen while its key is held.
    pub show_shadow_map: bool,
}

impl DemoState {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            light: LightRig::from_config(&config.light),
            ..Self::default()
        }
    }

    /// Advance one frame from the held keys and the quaternion slider rates.
    pub fn step(&mut self, dt: f32, actions: &ActionState, quat_rates: Vec3) {
        self.stats.tick(dt);
        self.show_shadow_map = actions.is_held(Action::ShowShadowMap);
        self.rotation.update(dt, actions.axis_vector(), quat_rates);
    }

    /// Apply a one-shot action. Returns true if the kernel handled it.
    pub fn trigger(&mut self, action: Action) -> bool {
        match action {
            Action::ResetRotation => self.rotation.reset(),
            Action::LockRotation => self.rotation.lock(),
            Action::ToggleMode => {
                let mode = self.rotation.mode().toggled();
                self.rotation.set_mode(mode);
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{EulerAngles, RotationMode};

    #[test]
    fn new_takes_light_from_config() {
        let mut config = DemoConfig::default();
        config.light.view_size = 55.0;
        let state = DemoState::new(&config);
        assert_eq!(state.light.view_size, 55.0);
        assert_eq!(state.rotation.mode(), RotationMode::Euler);
    }

    #[test]
    fn step_reads_held_keys() {
        let mut state = DemoState::default();
        let mut actions = ActionState::new();
        actions.press(Action::IncreaseZ);
        actions.press(Action::ShowShadowMap);
        state.step(1.0, &actions, Vec3::ZERO);
        assert!(state.show_shadow_map);
        assert_eq!(state.rotation.euler(), EulerAngles::new(0.0, 0.0, 45.0));

        actions.release(Action::ShowShadowMap);
        state.step(0.0, &actions, Vec3::ZERO);
        assert!(!state.show_shadow_map);
    }

    #[test]
    fn triggers() {
        let mut state = DemoState::default();
        assert!(state.trigger(Action::LockRotation));
        assert!(state.rotation.gimbal_locked());
        assert!(state.trigger(Action::ResetRotation));
        assert_eq!(state.rotation.euler(), EulerAngles::ZERO);
        assert!(state.trigger(Action::ToggleMode));
        assert_eq!(state.rotation.mode(), RotationMode::Quaternion);
        assert!(!state.trigger(Action::CameraForward));
    }
}
