pub mod input_event;
pub mod terminal;
pub mod terminal_event;

pub use input_event::{KeyCode, KeyEvent, KeyModifiers, KeyParseError};
pub use terminal::Terminal;
pub use terminal_event::TerminalEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPos {
    pub col: u16,
    pub row: u16,
}
