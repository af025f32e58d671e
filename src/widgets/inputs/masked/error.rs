#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("mask template is empty")]
    EmptyTemplate,
    #[error("mask template renders no positions")]
    NoPositions,
    #[error("unterminated escape section starting at template index {start}")]
    UnterminatedEscape { start: usize },
    #[error("placeholder cannot be the escape marker '\\''")]
    EscapePlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("character '{ch}' is not valid at position {index}")]
    InvalidCharacter { ch: char, index: usize },
    #[error("expected literal '{expected}' at position {index}, found '{found}'")]
    LiteralMismatch {
        expected: char,
        found: char,
        index: usize,
    },
    #[error("value has {actual} characters, mask holds at most {max}")]
    TooLong { max: usize, actual: usize },
    #[error("value has {actual} characters, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
