use std::fmt;
use std::str::FromStr;

/// A high-level action produced by the keyboard.
///
/// The kernel consumes actions, never raw key codes, so bindings can be
/// remapped without touching the rotation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Rotate positively about X while held.
    IncreaseX,
    DecreaseX,
    IncreaseY,
    DecreaseY,
    IncreaseZ,
    DecreaseZ,
    /// Show the shadow map full screen while held.
    ShowShadowMap,
    /// Return the rotation to identity.
    ResetRotation,
    /// Jump to the gimbal-locked pose (90, 90, -90).
    LockRotation,
    /// Switch between Euler angles and quaternions.
    ToggleMode,
    /// Show or hide the settings window.
    ToggleSettings,
    CameraForward,
    CameraBackward,
    CameraLeft,
    CameraRight,
    CameraUp,
    CameraDown,
    /// Move the camera faster while held.
    CameraBoost,
    Quit,
}

impl Action {
    pub const ALL: [Action; 19] = [
        Action::IncreaseX,
        Action::DecreaseX,
        Action::IncreaseY,
        Action::DecreaseY,
        Action::IncreaseZ,
        Action::DecreaseZ,
        Action::ShowShadowMap,
        Action::ResetRotation,
        Action::LockRotation,
        Action::ToggleMode,
        Action::ToggleSettings,
        Action::CameraForward,
        Action::CameraBackward,
        Action::CameraLeft,
        Action::CameraRight,
        Action::CameraUp,
        Action::CameraDown,
        Action::CameraBoost,
        Action::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::IncreaseX => "IncreaseX",
            Action::DecreaseX => "DecreaseX",
            Action::IncreaseY => "IncreaseY",
            Action::DecreaseY => "DecreaseY",
            Action::IncreaseZ => "IncreaseZ",
            Action::DecreaseZ => "DecreaseZ",
            Action::ShowShadowMap => "ShowShadowMap",
            Action::ResetRotation => "ResetRotation",
            Action::LockRotation => "LockRotation",
            Action::ToggleMode => "ToggleMode",
            Action::ToggleSettings => "ToggleSettings",
            Action::CameraForward => "CameraForward",
            Action::CameraBackward => "CameraBackward",
            Action::CameraLeft => "CameraLeft",
            Action::CameraRight => "CameraRight",
            Action::CameraUp => "CameraUp",
            Action::CameraDown => "CameraDown",
            Action::CameraBoost => "CameraBoost",
            Action::Quit => "Quit",
        }
    }

    /// Actions that only matter on the frame their key goes down.
    pub fn is_trigger(self) -> bool {
        matches!(
            self,
            Action::ResetRotation
                | Action::LockRotation
                | Action::ToggleMode
                | Action::ToggleSettings
                | Action::Quit
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an action name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_name_is_error() {
        let err = "Barrel roll".parse::<Action>().unwrap_err();
        assert_eq!(err, UnknownAction("Barrel roll".into()));
    }

    #[test]
    fn triggers_versus_held() {
        assert!(Action::LockRotation.is_trigger());
        assert!(!Action::IncreaseX.is_trigger());
        assert!(!Action::ShowShadowMap.is_trigger());
    }
}
