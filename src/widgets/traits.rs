use crate::terminal::{CursorPos, KeyEvent};

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    /// Key was taken by the widget but nothing visible changed.
    pub fn consumed() -> Self {
        Self {
            handled: true,
            request_render: false,
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive: widgets that take keyboard input
// ---------------------------------------------------------------------------

pub trait Interactive {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }
}
