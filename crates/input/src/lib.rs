//! Input handling: raw platform events mapped to high-level viewer actions.
//!
//! # Invariants
//! - Platform callbacks only push [`InputEvent`]s; nothing is applied until the
//!   frame loop drains the [`EventQueue`].
//! - Movement keys are level-triggered: a held key moves the camera every frame.
//! - The first cursor sample after capture or refocus never produces a look
//!   delta. Raw pointer motion is relative and never seeds the cursor.

pub mod action;
pub mod dispatcher;
pub mod event;
pub mod key;
pub mod state;

pub use action::Action;
pub use dispatcher::{InputDispatcher, KeyBindings};
pub use event::{EventQueue, InputEvent};
pub use key::Key;
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "phongview-input v0.1.0"
}
