use crate::action::Action;
use glam::Vec3;
use std::collections::BTreeMap;

/// Keys currently held down and the action each one was bound to.
///
/// An action stays held while any of its keys is down.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    keys: BTreeMap<String, Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as held for `action`. Returns true if the action was not
    /// held through any key before.
    pub fn press_key(&mut self, key: &str, action: Action) -> bool {
        let newly_held = !self.is_held(action);
        self.keys.insert(key.to_string(), action);
        newly_held
    }

    pub fn release_key(&mut self, key: &str) {
        self.keys.remove(key);
    }

    /// Hold `action` without a physical key, under the action's own name.
    pub fn press(&mut self, action: Action) -> bool {
        self.press_key(action.name(), action)
    }

    pub fn release(&mut self, action: Action) {
        self.release_key(action.name());
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.keys.values().any(|held| *held == action)
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// 1 while only `pos` is held, -1 while only `neg` is, 0 otherwise.
    pub fn axis(&self, pos: Action, neg: Action) -> f32 {
        f32::from(u8::from(self.is_held(pos))) - f32::from(u8::from(self.is_held(neg)))
    }

    /// Signed per-axis rotation input, each component in {-1, 0, 1}.
    pub fn axis_vector(&self) -> Vec3 {
        Vec3::new(
            self.axis(Action::IncreaseX, Action::DecreaseX),
            self.axis(Action::IncreaseY, Action::DecreaseY),
            self.axis(Action::IncreaseZ, Action::DecreaseZ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyBindings;

    #[test]
    fn no_keys_no_axis() {
        assert_eq!(ActionState::new().axis_vector(), Vec3::ZERO);
    }

    #[test]
    fn axis_vector_signs() {
        let mut s = ActionState::new();
        s.press(Action::IncreaseX);
        s.press(Action::DecreaseZ);
        assert_eq!(s.axis_vector(), Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut s = ActionState::new();
        s.press(Action::IncreaseY);
        s.press(Action::DecreaseY);
        assert_eq!(s.axis_vector().y, 0.0);
        assert_eq!(s.axis(Action::CameraForward, Action::CameraBackward), 0.0);
    }

    #[test]
    fn press_reports_new_only_once() {
        let mut s = ActionState::new();
        assert!(s.press(Action::LockRotation));
        assert!(!s.press(Action::LockRotation));
        s.release(Action::LockRotation);
        assert!(!s.is_held(Action::LockRotation));
    }

    #[test]
    fn action_held_until_last_key_released() {
        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert("ArrowUp".to_string(), "IncreaseX".to_string());
        let bindings = KeyBindings::with_overrides(&overrides).unwrap();

        let mut s = ActionState::new();
        for key in ["KeyU", "ArrowUp"] {
            let action = bindings.action_for(key).unwrap();
            s.press_key(key, action);
        }
        s.release_key("ArrowUp");
        assert!(s.is_held(Action::IncreaseX));
        assert_eq!(s.axis_vector().x, 1.0);

        s.release_key("KeyU");
        assert!(!s.is_held(Action::IncreaseX));
    }

    #[test]
    fn second_key_for_held_action_is_not_new() {
        let mut s = ActionState::new();
        assert!(s.press_key("KeyG", Action::LockRotation));
        assert!(!s.press_key("KeyU", Action::LockRotation));
        // Key repeat on the same key.
        assert!(!s.press_key("KeyG", Action::LockRotation));
    }

    #[test]
    fn clear_releases_everything() {
        let mut s = ActionState::new();
        s.press(Action::IncreaseX);
        s.press_key("F1", Action::ShowShadowMap);
        s.clear();
        assert!(!s.is_held(Action::ShowShadowMap));
        assert_eq!(s.axis_vector(), Vec3::ZERO);
    }
}
