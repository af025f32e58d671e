use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Inline terminal surface: draws a block of lines below the shell prompt and
/// redraws it in place.
pub struct Terminal {
    stdout: Stdout,
    origin_row: u16,
    drawn_lines: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (_, row) = cursor::position()?;
        Ok(Self {
            stdout: io::stdout(),
            origin_row: row,
            drawn_lines: 0,
        })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(key) = map_key_event(key) {
                        return Ok(TerminalEvent::Key(key));
                    }
                }
                Event::Resize(width, height) => {
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    /// Redraws `lines` at the origin row; each line is a list of `(text, dim)` pieces.
    pub fn render_lines(&mut self, lines: &[Vec<(String, bool)>]) -> io::Result<()> {
        let needed = lines.len() as u16;
        let (_, height) = terminal::size()?;
        let overflow = scroll_overflow(self.origin_row, needed, height);
        if overflow > 0 {
            queue!(self.stdout, terminal::ScrollUp(overflow))?;
            self.origin_row = self.origin_row.saturating_sub(overflow);
        }

        for (idx, line) in lines.iter().enumerate() {
            let row = self.row(idx as u16);
            queue!(
                self.stdout,
                cursor::MoveTo(0, row),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
            for (text, dim) in line {
                if *dim {
                    queue!(
                        self.stdout,
                        SetForegroundColor(crossterm::style::Color::DarkGrey),
                        Print(text),
                        ResetColor
                    )?;
                } else {
                    queue!(self.stdout, Print(text))?;
                }
            }
        }
        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.drawn_lines = needed;
        Ok(())
    }

    /// Places the cursor relative to the drawn block.
    pub fn place_cursor(&mut self, pos: CursorPos) -> io::Result<()> {
        let row = self.row(pos.row);
        queue!(
            self.stdout,
            cursor::MoveTo(pos.col, row),
            cursor::Show
        )?;
        Ok(())
    }

    pub fn move_to_end(&mut self) -> io::Result<()> {
        let row = self.row(self.drawn_lines);
        execute!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn row(&self, offset: u16) -> u16 {
        self.origin_row.saturating_add(offset)
    }
}

/// Rows the screen must scroll so `needed` lines fit below `origin_row`.
fn scroll_overflow(origin_row: u16, needed: u16, height: u16) -> u16 {
    origin_row.saturating_add(needed).saturating_sub(height)
}

fn map_key_event(event: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    Some(KeyEvent {
        code: map_key_code(event.code)?,
        modifiers: map_key_modifiers(event.modifiers),
    })
}

fn map_key_code(code: crossterm::event::KeyCode) -> Option<KeyCode> {
    use crossterm::event::KeyCode as Raw;

    let code = match code {
        Raw::Char(ch) => KeyCode::Char(ch),
        Raw::Backspace => KeyCode::Backspace,
        Raw::Delete => KeyCode::Delete,
        Raw::Left => KeyCode::Left,
        Raw::Right => KeyCode::Right,
        Raw::Home => KeyCode::Home,
        Raw::End => KeyCode::End,
        Raw::Up => KeyCode::Up,
        Raw::Down => KeyCode::Down,
        Raw::Tab => KeyCode::Tab,
        Raw::BackTab => KeyCode::BackTab,
        Raw::Enter => KeyCode::Enter,
        Raw::Esc => KeyCode::Esc,
        _ => return None,
    };
    Some(code)
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    use crossterm::event::KeyModifiers as Raw;

    KeyModifiers {
        shift: modifiers.contains(Raw::SHIFT),
        control: modifiers.contains(Raw::CONTROL),
        alt: modifiers.contains(Raw::ALT),
    }
}

#[cfg(test)]
mod tests {
    use super::{map_key_code, scroll_overflow};
    use crate::terminal::KeyCode;

    #[test]
    fn overflow_only_when_block_passes_bottom() {
        assert_eq!(scroll_overflow(3, 3, 24), 0);
        assert_eq!(scroll_overflow(22, 3, 24), 1);
        assert_eq!(scroll_overflow(u16::MAX - 1, 10, 24), u16::MAX - 24);
    }

    #[test]
    fn unused_keys_are_dropped() {
        assert_eq!(
            map_key_code(crossterm::event::KeyCode::BackTab),
            Some(KeyCode::BackTab)
        );
        assert_eq!(map_key_code(crossterm::event::KeyCode::PageDown), None);
    }
}
