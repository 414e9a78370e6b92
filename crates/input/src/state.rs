use crate::key::Key;
use glam::Vec2;

/// Held-key flags plus the cursor tracking needed to turn absolute cursor
/// positions into look deltas.
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [bool; Key::COUNT],
    last_cursor: Vec2,
    first_mouse: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: [false; Key::COUNT],
            last_cursor: Vec2::ZERO,
            first_mouse: true,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        self.keys[key.index()] = pressed;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    /// Offset since the previous cursor sample.
    ///
    /// The first sample only seeds the last position. Y is inverted because
    /// window coordinates grow downward.
    pub fn cursor_offset(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        if self.first_mouse {
            self.last_cursor = current;
            self.first_mouse = false;
        }
        let offset = Vec2::new(current.x - self.last_cursor.x, self.last_cursor.y - current.y);
        self.last_cursor = current;
        offset
    }

    /// Treat the next cursor sample as the first one again.
    pub fn reset_mouse(&mut self) {
        self.first_mouse = true;
    }

    pub fn last_cursor(&self) -> Vec2 {
        self.last_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_yields_zero_offset() {
        let mut state = InputState::new();
        assert_eq!(state.cursor_offset(400.0, 300.0), Vec2::ZERO);
        assert_eq!(state.last_cursor(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn later_samples_invert_y() {
        let mut state = InputState::new();
        state.cursor_offset(400.0, 300.0);
        let offset = state.cursor_offset(410.0, 290.0);
        assert_eq!(offset, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn reset_rearms_first_sample() {
        let mut state = InputState::new();
        state.cursor_offset(0.0, 0.0);
        state.reset_mouse();
        assert_eq!(state.cursor_offset(900.0, 900.0), Vec2::ZERO);
    }

    #[test]
    fn key_flags_track_press_and_release() {
        let mut state = InputState::new();
        state.set_key(Key::W, true);
        state.set_key(Key::Up, true);
        assert!(state.is_down(Key::W));
        state.set_key(Key::W, false);
        assert!(!state.is_down(Key::W));
        assert!(state.is_down(Key::Up));
    }
}
