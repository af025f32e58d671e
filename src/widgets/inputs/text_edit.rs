use std::ops::Range;

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

/// Replaces the char range `range` of `value` with `text`. Out-of-bounds ends are clamped.
pub fn replace_range(value: &str, range: Range<usize>, text: &str) -> String {
    let len = char_count(value);
    let end = range.end.min(len);
    let start = range.start.min(end);
    let start_byte = byte_index_at_char(value, start);
    let end_byte = byte_index_at_char(value, end);

    let mut out = String::with_capacity(value.len() + text.len());
    out.push_str(&value[..start_byte]);
    out.push_str(text);
    out.push_str(&value[end_byte..]);
    out
}

pub fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::{byte_index_at_char, char_count, replace_range};

    #[test]
    fn replace_range_uses_char_indices() {
        assert_eq!(replace_range("ab-cd", 1..3, "X"), "aXcd");
        assert_eq!(replace_range("ñö-üé", 0..2, "ab"), "ab-üé");
        assert_eq!(replace_range("abc", 3..3, "d"), "abcd");
    }

    #[test]
    fn replace_range_clamps_out_of_bounds() {
        assert_eq!(replace_range("abc", 2..9, "Z"), "abZ");
        assert_eq!(replace_range("", 0..4, "xyz"), "xyz");
        assert_eq!(replace_range("abc", 5..2, "!"), "ab!c");
    }

    #[test]
    fn char_helpers() {
        assert_eq!(char_count("a-é"), 3);
        assert_eq!(byte_index_at_char("é1", 1), 2);
        assert_eq!(byte_index_at_char("é1", 9), 3);
    }
}
