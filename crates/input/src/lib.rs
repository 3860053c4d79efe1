//! Keyboard input mapped to demo actions.
//!
//! # Invariants
//! - The kernel only ever sees [`Action`]s and [`ActionState`], never key codes.
//! - Every binding table starts from the defaults; config files only override.

pub mod action;
pub mod bindings;
pub mod state;

pub use action::{Action, UnknownAction};
pub use bindings::KeyBindings;
pub use state::ActionState;
