use std::str::FromStr;

/// Keys the masked field and the form loop react to. Anything else is dropped when
/// terminal events are mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Tab,
    BackTab,
    Enter,
    Esc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        control: false,
        alt: false,
    };
    pub const SHIFT: KeyModifiers = KeyModifiers {
        shift: true,
        ..Self::NONE
    };
    pub const CONTROL: KeyModifiers = KeyModifiers {
        control: true,
        ..Self::NONE
    };
    pub const ALT: KeyModifiers = KeyModifiers {
        alt: true,
        ..Self::NONE
    };

    /// True when every modifier held in `other` is held here too.
    pub fn contains(self, other: KeyModifiers) -> bool {
        (self.shift || !other.shift)
            && (self.control || !other.control)
            && (self.alt || !other.alt)
    }

    pub fn union(self, other: KeyModifiers) -> KeyModifiers {
        KeyModifiers {
            shift: self.shift || other.shift,
            control: self.control || other.control,
            alt: self.alt || other.alt,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key '{0}'")]
pub struct KeyParseError(String);

/// Parses key names as written in replay scripts: `"7"`, `"Backspace"`, `"Shift+Left"`,
/// `"Ctrl+A"`, `"Space"`.
impl FromStr for KeyEvent {
    type Err = KeyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = input;
        while let Some((prefix, tail)) = rest.split_once('+') {
            if tail.is_empty() {
                break;
            }
            let held = match prefix.to_ascii_lowercase().as_str() {
                "shift" => KeyModifiers::SHIFT,
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                _ => return Err(KeyParseError(input.to_string())),
            };
            modifiers = modifiers.union(held);
            rest = tail;
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(ch), None) => KeyCode::Char(ch),
            _ => match rest.to_ascii_lowercase().as_str() {
                "backspace" => KeyCode::Backspace,
                "enter" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "tab" => KeyCode::Tab,
                "backtab" => KeyCode::BackTab,
                "delete" | "del" => KeyCode::Delete,
                "space" => KeyCode::Char(' '),
                _ => return Err(KeyParseError(input.to_string())),
            },
        };

        Ok(KeyEvent { code, modifiers })
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn parses_plain_and_named_keys() {
        assert_eq!("7".parse::<KeyEvent>(), Ok(KeyEvent::plain(KeyCode::Char('7'))));
        assert_eq!(
            "backspace".parse::<KeyEvent>(),
            Ok(KeyEvent::plain(KeyCode::Backspace))
        );
        assert_eq!("Space".parse::<KeyEvent>(), Ok(KeyEvent::plain(KeyCode::Char(' '))));
        assert_eq!("+".parse::<KeyEvent>(), Ok(KeyEvent::plain(KeyCode::Char('+'))));
    }

    #[test]
    fn parses_modifiers() {
        let key = "Shift+Left".parse::<KeyEvent>().expect("key");
        assert_eq!(key.code, KeyCode::Left);
        assert!(key.modifiers.contains(KeyModifiers::SHIFT));

        let key = "Ctrl+Shift+a".parse::<KeyEvent>().expect("key");
        assert_eq!(key.code, KeyCode::Char('a'));
        assert!(
            key.modifiers
                .contains(KeyModifiers::CONTROL.union(KeyModifiers::SHIFT))
        );
        assert!(!key.modifiers.contains(KeyModifiers::ALT));

        let key = "Ctrl++".parse::<KeyEvent>().expect("key");
        assert_eq!(key.code, KeyCode::Char('+'));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!("Hyper+x".parse::<KeyEvent>().is_err());
        assert!("PageDown".parse::<KeyEvent>().is_err());
    }
}
