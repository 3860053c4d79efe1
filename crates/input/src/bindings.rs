use crate::action::{Action, UnknownAction};
use std::collections::BTreeMap;

/// Key name to action table.
///
/// Key names are the `Debug` names of winit's `KeyCode` (`KeyU`, `F1`,
/// `ShiftLeft`, ...), which keeps this crate free of windowing types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let table = [
            ("KeyU", Action::IncreaseX),
            ("KeyJ", Action::DecreaseX),
            ("KeyI", Action::IncreaseY),
            ("KeyK", Action::DecreaseY),
            ("KeyO", Action::IncreaseZ),
            ("KeyL", Action::DecreaseZ),
            ("F1", Action::ShowShadowMap),
            ("KeyR", Action::ResetRotation),
            ("KeyG", Action::LockRotation),
            ("KeyM", Action::ToggleMode),
            ("Tab", Action::ToggleSettings),
            ("KeyW", Action::CameraForward),
            ("KeyS", Action::CameraBackward),
            ("KeyA", Action::CameraLeft),
            ("KeyD", Action::CameraRight),
            ("Space", Action::CameraUp),
            ("ControlLeft", Action::CameraDown),
            ("ShiftLeft", Action::CameraBoost),
            ("Escape", Action::Quit),
        ];
        Self {
            keys: table
                .into_iter()
                .map(|(k, a)| (k.to_string(), a))
                .collect(),
        }
    }
}

impl KeyBindings {
    /// Default bindings with `overrides` (key name to action name) applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, UnknownAction> {
        let mut bindings = Self::default();
        for (key, action) in overrides {
            let action: Action = action.parse()?;
            bindings.bind(key.clone(), action);
        }
        Ok(bindings)
    }

    /// Bind `key` to `action`, replacing any action previously on that key.
    pub fn bind(&mut self, key: impl Into<String>, action: Action) {
        let key = key.into();
        tracing::debug!("bind {key} -> {action}");
        self.keys.insert(key, action);
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_axis_keys() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("KeyU"), Some(Action::IncreaseX));
        assert_eq!(b.action_for("KeyJ"), Some(Action::DecreaseX));
        assert_eq!(b.action_for("KeyI"), Some(Action::IncreaseY));
        assert_eq!(b.action_for("KeyK"), Some(Action::DecreaseY));
        assert_eq!(b.action_for("KeyO"), Some(Action::IncreaseZ));
        assert_eq!(b.action_for("KeyL"), Some(Action::DecreaseZ));
        assert_eq!(b.action_for("F1"), Some(Action::ShowShadowMap));
        assert_eq!(b.action_for("KeyQ"), None);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let mut overrides = BTreeMap::new();
        overrides.insert("KeyU".to_string(), "LockRotation".to_string());
        overrides.insert("KeyP".to_string(), "IncreaseX".to_string());
        let b = KeyBindings::with_overrides(&overrides).unwrap();
        assert_eq!(b.action_for("KeyU"), Some(Action::LockRotation));
        assert_eq!(b.action_for("KeyP"), Some(Action::IncreaseX));
        assert_eq!(b.action_for("KeyG"), Some(Action::LockRotation));
        assert_eq!(b.len(), KeyBindings::default().len() + 1);
    }

    #[test]
    fn override_with_unknown_action_fails() {
        let mut overrides = BTreeMap::new();
        overrides.insert("KeyU".to_string(), "Spin".to_string());
        assert!(KeyBindings::with_overrides(&overrides).is_err());
    }

    #[test]
    fn bind_replaces_existing_key() {
        let mut b = KeyBindings::default();
        assert!(!b.is_empty());
        let before = b.len();
        b.bind("Escape", Action::ToggleSettings);
        assert_eq!(b.len(), before);
        assert_eq!(b.action_for("Escape"), Some(Action::ToggleSettings));
    }
}
