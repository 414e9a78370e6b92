//! The per-frame update and submission pipeline.
//!
//! # Invariants
//! - Each iteration runs, in order: timing, input drain, held-key movement,
//!   camera matrices, lighting uniforms, draw composition.
//! - All camera and lighting updates happen before the frame's first draw.
//! - An exit request lets the current iteration finish; the loop is
//!   `Terminated` afterwards and produces no more frames.
//! - A framebuffer resize reaches the presentation side only through the
//!   [`Frame`] of the iteration that drained it.

use crate::camera::FlyCamera;
use crate::draw::DrawList;
use crate::scene::Scene;
use phongview_input::{Action, InputDispatcher, InputEvent};

/// Wall-clock bookkeeping between iterations.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call (or since t = 0 on the first call).
    /// A clock that runs backwards yields zero.
    pub fn advance(&mut self, now: f32) -> f32 {
        let delta = (now - self.last_frame).max(0.0);
        self.last_frame = now;
        delta
    }

    pub fn last_frame(&self) -> f32 {
        self.last_frame
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Output of one iteration, ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub time: f32,
    pub delta: f32,
    pub draws: DrawList,
    /// Latest non-degenerate framebuffer size drained this iteration.
    pub resized: Option<(u32, u32)>,
}

/// Explicit application state driven once per iteration.
#[derive(Debug)]
pub struct FrameLoop {
    camera: FlyCamera,
    dispatcher: InputDispatcher,
    scene: Scene,
    clock: FrameClock,
    aspect: f32,
    resized: Option<(u32, u32)>,
    state: LoopState,
}

impl FrameLoop {
    pub fn new(scene: Scene, width: u32, height: u32) -> Self {
        let camera = scene.config.camera.build();
        Self::with_camera(scene, camera, width, height)
    }

    pub fn with_camera(scene: Scene, camera: FlyCamera, width: u32, height: u32) -> Self {
        Self {
            camera,
            dispatcher: InputDispatcher::new(),
            scene,
            clock: FrameClock::new(),
            aspect: aspect_ratio(width, height).unwrap_or(1.0),
            resized: None,
            state: LoopState::Running,
        }
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Run one iteration at wall-clock time `now` (seconds since startup).
    ///
    /// Returns `None` once the loop has terminated.
    pub fn step(&mut self, now: f32, events: impl IntoIterator<Item = InputEvent>) -> Option<Frame> {
        if self.state == LoopState::Terminated {
            return None;
        }

        let delta = self.clock.advance(now);

        let mut exit = false;
        for event in events {
            if let Some(action) = self.dispatcher.handle_event(event) {
                exit |= self.apply(action, delta);
            }
        }

        let held: Vec<_> = self.dispatcher.held_movements().collect();
        for movement in held {
            self.apply(Action::Move(movement), delta);
        }

        let draws = self.scene.compose_frame(&self.camera, now, self.aspect);

        if exit {
            tracing::info!("exit requested, terminating frame loop");
            self.state = LoopState::Terminated;
        }

        Some(Frame {
            time: now,
            delta,
            draws,
            resized: self.resized.take(),
        })
    }

    /// Apply one action. Returns true when it asks the loop to exit.
    fn apply(&mut self, action: Action, delta: f32) -> bool {
        match action {
            Action::Move(direction) => self.camera.process_keyboard(direction, delta),
            Action::Look(offset) => self.camera.process_mouse_movement(offset.x, offset.y),
            Action::Zoom(amount) => self.camera.process_mouse_scroll(amount),
            Action::Resize { width, height } => match aspect_ratio(width, height) {
                Some(aspect) => {
                    tracing::debug!(width, height, "framebuffer resized");
                    self.aspect = aspect;
                    self.resized = Some((width, height));
                }
                None => tracing::debug!(width, height, "ignoring degenerate resize"),
            },
            Action::Exit => return true,
        }
        false
    }
}

fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    (width > 0 && height > 0).then(|| width as f32 / height as f32)
}
