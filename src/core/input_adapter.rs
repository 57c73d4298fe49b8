use std::collections::HashSet;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::controller::{Button, Controller};

/// Pixel-delta wheel events are converted to lines at this rate
const PIXELS_PER_LINE: f32 = 100.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    pressed_keys: HashSet<Button>,
    /// Last cursor position in logical pixels
    mouse_position: Option<(f32, f32)>,
    mouse_delta: (f32, f32),
    scroll_delta: f32,
    scale_factor: f64,
}

impl WinitController {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_position: None,
            mouse_delta: (0.0, 0.0),
            scroll_delta: 0.0,
            scale_factor,
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        // Physical positions change meaning, so the next move must not produce a jump
        self.mouse_position = None;
    }

    /// Process a Winit WindowEvent; returns true if pointer state changed
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                match Self::mouse_button_to_button(*button) {
                    Some(btn) => {
                        self.set_button(btn, *state);
                        true
                    }
                    None => false,
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = to_logical_position(*position, self.scale_factor);
                if let Some(old_pos) = self.mouse_position {
                    self.mouse_delta.0 += new_pos.0 - old_pos.0;
                    self.mouse_delta.1 += new_pos.1 - old_pos.1;
                }
                self.mouse_position = Some(new_pos);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += scroll_lines(*delta, self.scale_factor);
                true
            }
            WindowEvent::Focused(false) => {
                self.pressed_keys.clear();
                false
            }
            _ => false,
        }
    }

    /// Reset per-frame state (pointer and wheel deltas)
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(button);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }
}

/// Cursor position in logical pixels
fn to_logical_position(position: PhysicalPosition<f64>, scale_factor: f64) -> (f32, f32) {
    let logical = position.to_logical::<f32>(scale_factor);
    (logical.x, logical.y)
}

/// Wheel movement in lines; pixel deltas are made logical first
fn scroll_lines(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.to_logical::<f32>(scale_factor).y / PIXELS_PER_LINE,
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn pointer_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}
