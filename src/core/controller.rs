/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    MouseMiddle,
}

/// Controller - pointer and button state accumulated between frames
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Cursor movement in logical pixels since the last reset
    fn pointer_delta(&self) -> (f32, f32);

    /// Wheel movement in lines since the last reset (positive = away from user)
    fn scroll_delta(&self) -> f32;
}
