use crate::key::Key;
use std::collections::VecDeque;

/// A raw input event as reported by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A tracked key changed state.
    Key { key: Key, pressed: bool },
    /// Cursor moved to an absolute window position (pixels).
    CursorMoved { x: f32, y: f32 },
    /// Raw pointer motion in pixels, unbounded by the window. Y grows downward.
    MouseMotion { dx: f32, dy: f32 },
    /// The window regained focus; the next cursor sample starts a new drag.
    FocusGained,
    /// Vertical scroll in lines; positive is away from the user.
    Scroll { y: f32 },
    /// The framebuffer was resized.
    Resized { width: u32, height: u32 },
    /// The window asked to close.
    CloseRequested,
}

/// FIFO of pending input events.
///
/// Window callbacks push; the frame loop drains everything once per iteration.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_arrival_order() {
        let mut queue = EventQueue::new();
        queue.push(InputEvent::Key {
            key: Key::W,
            pressed: true,
        });
        queue.push(InputEvent::Scroll { y: 1.0 });
        queue.push(InputEvent::CloseRequested);
        assert_eq!(queue.len(), 3);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[1], InputEvent::Scroll { y: 1.0 });
        assert_eq!(drained[2], InputEvent::CloseRequested);
        assert!(queue.is_empty());
    }
}
