use crate::action::Action;
use crate::event::InputEvent;
use crate::key::Key;
use crate::state::InputState;
use glam::Vec2;
use phongview_common::CameraMovement;

/// Which keys drive which camera movement.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Vec<Key>,
    pub backward: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub exit: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![Key::W, Key::Up],
            backward: vec![Key::S, Key::Down],
            left: vec![Key::A, Key::Left],
            right: vec![Key::D, Key::Right],
            exit: Key::Escape,
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, movement: CameraMovement) -> &[Key] {
        match movement {
            CameraMovement::Forward => &self.forward,
            CameraMovement::Backward => &self.backward,
            CameraMovement::Left => &self.left,
            CameraMovement::Right => &self.right,
        }
    }
}

/// Turns raw events into [`InputState`] updates and [`Action`]s.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    state: InputState,
    bindings: KeyBindings,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            state: InputState::new(),
            bindings,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    /// Record one event. Returns the action it triggers immediately, if any.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::Key { key, pressed } => {
                self.state.set_key(key, pressed);
                if pressed && key == self.bindings.exit {
                    tracing::info!("exit key pressed");
                    Some(Action::Exit)
                } else {
                    None
                }
            }
            InputEvent::CursorMoved { x, y } => Some(Action::Look(self.state.cursor_offset(x, y))),
            InputEvent::MouseMotion { dx, dy } => Some(Action::Look(Vec2::new(dx, -dy))),
            InputEvent::FocusGained => {
                self.state.reset_mouse();
                None
            }
            InputEvent::Scroll { y } => Some(Action::Zoom(y)),
            InputEvent::Resized { width, height } => Some(Action::Resize { width, height }),
            InputEvent::CloseRequested => Some(Action::Exit),
        }
    }

    /// Movements whose keys are currently held, in fixed sampling order.
    ///
    /// Opposing movements are both reported when both are held.
    pub fn held_movements(&self) -> impl Iterator<Item = CameraMovement> + '_ {
        CameraMovement::ALL.into_iter().filter(|movement| {
            self.bindings
                .keys_for(*movement)
                .iter()
                .any(|key| self.state.is_down(*key))
        })
    }
}
