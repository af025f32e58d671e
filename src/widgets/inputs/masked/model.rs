use std::sync::Arc;

pub const ESCAPE: char = '\'';
pub const DEFAULT_PLACEHOLDER: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskSymbol {
    /// `#`
    Digit,
    /// `U`
    Upper,
    /// `L`
    Lower,
    /// `A`
    Alnum,
    /// `?`
    Letter,
    /// `*`
    Any,
    /// `H`
    Hex,
}

impl MaskSymbol {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Self::Digit),
            'U' => Some(Self::Upper),
            'L' => Some(Self::Lower),
            'A' => Some(Self::Alnum),
            '?' => Some(Self::Letter),
            '*' => Some(Self::Any),
            'H' => Some(Self::Hex),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Digit => '#',
            Self::Upper => 'U',
            Self::Lower => 'L',
            Self::Alnum => 'A',
            Self::Letter => '?',
            Self::Any => '*',
            Self::Hex => 'H',
        }
    }

    /// Case-forcing symbols rewrite the input before it is validated.
    pub fn transform(self, ch: char) -> char {
        match self {
            Self::Upper => single_char(ch.to_uppercase()).unwrap_or(ch),
            Self::Lower => single_char(ch.to_lowercase()).unwrap_or(ch),
            Self::Digit | Self::Alnum | Self::Letter | Self::Any | Self::Hex => ch,
        }
    }

    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Upper | Self::Lower | Self::Letter => ch.is_alphabetic(),
            Self::Alnum => ch.is_alphabetic() || ch.is_ascii_digit(),
            Self::Any => true,
            Self::Hex => ch.is_ascii_hexdigit(),
        }
    }
}

// Multi-char case mappings (e.g. 'ß' -> "SS") cannot fit a single slot.
fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    match chars.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Variable(MaskSymbol),
    Fixed(char),
    /// The placeholder itself written in the template: an editable-looking slot that
    /// refuses every character.
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPosition {
    pub symbol: char,
    pub index: usize,
    pub kind: SlotKind,
    pub is_first: bool,
    pub is_last: bool,
}

impl MaskPosition {
    pub fn is_variable(&self) -> bool {
        !matches!(self.kind, SlotKind::Fixed(_))
    }

    pub fn is_fixed(&self) -> bool {
        !self.is_variable()
    }

    pub fn literal(&self) -> Option<char> {
        match self.kind {
            SlotKind::Fixed(ch) => Some(ch),
            SlotKind::Variable(_) | SlotKind::Blank => None,
        }
    }

    /// Character shown while the position holds no user content.
    pub fn blank(&self, placeholder: char) -> char {
        match self.kind {
            SlotKind::Fixed(ch) => ch,
            SlotKind::Variable(_) | SlotKind::Blank => placeholder,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct CompiledMaskInner {
    template: String,
    placeholder: char,
    positions: Vec<MaskPosition>,
    empty_mask: String,
}

/// Immutable result of compiling a mask template. Cloning shares the same data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMask {
    inner: Arc<CompiledMaskInner>,
}

impl CompiledMask {
    pub(super) fn from_parts(
        template: String,
        placeholder: char,
        positions: Vec<MaskPosition>,
        empty_mask: String,
    ) -> Self {
        Self {
            inner: Arc::new(CompiledMaskInner {
                template,
                placeholder,
                positions,
                empty_mask,
            }),
        }
    }

    pub fn template(&self) -> &str {
        self.inner.template.as_str()
    }

    pub fn placeholder(&self) -> char {
        self.inner.placeholder
    }

    pub fn positions(&self) -> &[MaskPosition] {
        self.inner.positions.as_slice()
    }

    pub fn position(&self, index: usize) -> Option<&MaskPosition> {
        self.inner.positions.get(index)
    }

    pub fn empty_mask(&self) -> &str {
        self.inner.empty_mask.as_str()
    }

    pub fn max_len(&self) -> usize {
        self.inner.positions.len()
    }

    pub fn variable_count(&self) -> usize {
        self.positions()
            .iter()
            .filter(|position| position.is_variable())
            .count()
    }

    pub fn is_fixed_at(&self, index: usize) -> bool {
        self.position(index).is_some_and(MaskPosition::is_fixed)
    }

    /// True when `text` fills every variable slot with an accepted character. Blank
    /// slots only ever hold the placeholder.
    pub fn is_complete(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != self.max_len() {
            return false;
        }
        self.positions()
            .iter()
            .zip(chars)
            .all(|(position, ch)| match position.kind {
                SlotKind::Fixed(literal) => ch == literal,
                SlotKind::Variable(symbol) => symbol.accepts(ch),
                SlotKind::Blank => ch == self.placeholder(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::MaskSymbol;
    use crate::widgets::inputs::masked::parser::compile;

    #[test]
    fn case_symbols_transform_before_validation() {
        assert_eq!(MaskSymbol::Upper.transform('a'), 'A');
        assert_eq!(MaskSymbol::Lower.transform('Q'), 'q');
        assert_eq!(MaskSymbol::Digit.transform('a'), 'a');
        assert_eq!(MaskSymbol::Upper.transform('ß'), 'ß');
    }

    #[test]
    fn symbol_validity() {
        assert!(MaskSymbol::Digit.accepts('7'));
        assert!(!MaskSymbol::Digit.accepts('x'));
        assert!(MaskSymbol::Hex.accepts('f'));
        assert!(MaskSymbol::Hex.accepts('F'));
        assert!(!MaskSymbol::Hex.accepts('g'));
        assert!(MaskSymbol::Alnum.accepts('z'));
        assert!(MaskSymbol::Alnum.accepts('3'));
        assert!(!MaskSymbol::Alnum.accepts('-'));
        assert!(MaskSymbol::Letter.accepts('é'));
        assert!(!MaskSymbol::Letter.accepts('1'));
        assert!(MaskSymbol::Any.accepts(' '));
    }

    #[test]
    fn blank_slot_completes_only_with_placeholder() {
        let mask = compile("## ##", ' ').expect("mask");
        assert!(mask.is_complete("12 34"));
        assert!(!mask.is_complete("12x34"));
        assert!(!mask.is_complete("1  34"));
    }

    #[test]
    fn symbol_chars_round_trip() {
        for ch in ['#', 'U', 'L', 'A', '?', '*', 'H'] {
            let symbol = MaskSymbol::from_char(ch).expect("symbol");
            assert_eq!(symbol.as_char(), ch);
        }
        assert_eq!(MaskSymbol::from_char('\''), None);
        assert_eq!(MaskSymbol::from_char('-'), None);
    }
}
