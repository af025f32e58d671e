use super::error::FormatError;
use super::model::{CompiledMask, SlotKind};
use crate::widgets::inputs::text_edit;

/// Converts raw values to their masked display form and back.
#[derive(Debug, Clone)]
pub struct MaskFormatter {
    mask: CompiledMask,
    value_contains_literals: bool,
}

impl MaskFormatter {
    pub fn new(mask: CompiledMask) -> Self {
        Self {
            mask,
            value_contains_literals: false,
        }
    }

    /// When set, raw values carry the mask literals and they must match.
    pub fn with_value_contains_literals(mut self, enabled: bool) -> Self {
        self.value_contains_literals = enabled;
        self
    }

    pub fn mask(&self) -> &CompiledMask {
        &self.mask
    }

    /// `"11122233344"` with `###.###.###-##` becomes `"111.222.333-44"`. Short values are
    /// padded with the placeholder.
    pub fn value_to_string(&self, value: &str) -> Result<String, FormatError> {
        let chars: Vec<char> = value.chars().collect();
        let placeholder = self.mask.placeholder();
        let mut idx = 0usize;
        let mut out = String::with_capacity(self.mask.empty_mask().len());

        for position in self.mask.positions() {
            match position.kind {
                // Blank slots print the placeholder and consume nothing, like a literal.
                SlotKind::Fixed(_) | SlotKind::Blank => {
                    let literal = position.blank(placeholder);
                    if self.value_contains_literals
                        && let Some(&ch) = chars.get(idx)
                    {
                        if ch != literal {
                            return Err(FormatError::LiteralMismatch {
                                expected: literal,
                                found: ch,
                                index: idx,
                            });
                        }
                        idx += 1;
                    }
                    out.push(literal);
                }
                SlotKind::Variable(symbol) => {
                    let Some(&raw) = chars.get(idx) else {
                        out.push(placeholder);
                        continue;
                    };
                    let ch = symbol.transform(raw);
                    if !symbol.accepts(ch) {
                        return Err(FormatError::InvalidCharacter { ch: raw, index: idx });
                    }
                    out.push(ch);
                    idx += 1;
                }
            }
        }

        if idx < chars.len() {
            return Err(FormatError::TooLong {
                max: idx,
                actual: chars.len(),
            });
        }
        Ok(out)
    }

    /// Inverse of [`Self::value_to_string`]: validates a display string and returns the
    /// content of the filled slots. Unfilled slots are dropped.
    pub fn string_to_value(&self, text: &str) -> Result<String, FormatError> {
        let expected = self.mask.max_len();
        let actual = text_edit::char_count(text);
        if actual != expected {
            return Err(FormatError::LengthMismatch { expected, actual });
        }

        let placeholder = self.mask.placeholder();
        let mut out = String::new();
        for (position, ch) in self.mask.positions().iter().zip(text.chars()) {
            match position.kind {
                SlotKind::Fixed(_) | SlotKind::Blank => {
                    let literal = position.blank(placeholder);
                    if ch != literal {
                        return Err(FormatError::LiteralMismatch {
                            expected: literal,
                            found: ch,
                            index: position.index,
                        });
                    }
                    if self.value_contains_literals {
                        out.push(ch);
                    }
                }
                SlotKind::Variable(symbol) => {
                    if ch == placeholder {
                        continue;
                    }
                    if !symbol.accepts(ch) {
                        return Err(FormatError::InvalidCharacter {
                            ch,
                            index: position.index,
                        });
                    }
                    out.push(ch);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::MaskFormatter;
    use crate::widgets::inputs::masked::error::FormatError;
    use crate::widgets::inputs::masked::parser::compile;

    fn formatter(template: &str, placeholder: char) -> MaskFormatter {
        MaskFormatter::new(compile(template, placeholder).expect("mask"))
    }

    #[test]
    fn raw_value_fills_variable_slots() {
        let f = formatter("###.###.###-##", ' ');
        assert_eq!(
            f.value_to_string("11122233344").expect("format"),
            "111.222.333-44"
        );
    }

    #[test]
    fn short_value_is_padded() {
        let f = formatter("#####-###", '_');
        assert_eq!(f.value_to_string("123").expect("format"), "123__-___");
        assert_eq!(f.value_to_string("").expect("format"), "_____-___");
    }

    #[test]
    fn case_symbols_rewrite_value() {
        let f = formatter("UU-LL", '_');
        assert_eq!(f.value_to_string("abCD").expect("format"), "AB-cd");
    }

    #[test]
    fn invalid_or_long_values_fail() {
        let f = formatter("##-##", '_');
        assert_eq!(
            f.value_to_string("12a4"),
            Err(FormatError::InvalidCharacter { ch: 'a', index: 2 })
        );
        assert_eq!(
            f.value_to_string("123456"),
            Err(FormatError::TooLong { max: 4, actual: 6 })
        );
    }

    #[test]
    fn value_with_literals_must_match_them() {
        let f = formatter("##-##", '_').with_value_contains_literals(true);
        assert_eq!(f.value_to_string("12-34").expect("format"), "12-34");
        assert_eq!(
            f.value_to_string("12/34"),
            Err(FormatError::LiteralMismatch {
                expected: '-',
                found: '/',
                index: 2
            })
        );
    }

    #[test]
    fn string_to_value_strips_literals_and_blanks() {
        let f = formatter("(##)#-####-####", '_');
        assert_eq!(
            f.string_to_value("(11)9-8765-4321").expect("parse"),
            "11987654321"
        );
        assert_eq!(f.string_to_value("(11)_-____-____").expect("parse"), "11");
        assert_eq!(
            f.string_to_value("(11)x-____-____"),
            Err(FormatError::InvalidCharacter { ch: 'x', index: 4 })
        );
        assert_eq!(
            f.string_to_value("(11)"),
            Err(FormatError::LengthMismatch {
                expected: 15,
                actual: 4
            })
        );
    }

    #[test]
    fn blank_slots_are_skipped_by_values() {
        let f = formatter("## ##", ' ');
        assert_eq!(f.value_to_string("1234").expect("format"), "12 34");
        assert_eq!(f.string_to_value("12 34").expect("parse"), "1234");
        assert_eq!(
            f.string_to_value("12x34"),
            Err(FormatError::LiteralMismatch {
                expected: ' ',
                found: 'x',
                index: 2
            })
        );
    }

    #[test]
    fn string_to_value_keeps_literals_on_request() {
        let f = formatter("##-##", '_').with_value_contains_literals(true);
        assert_eq!(f.string_to_value("12-34").expect("parse"), "12-34");
    }
}
