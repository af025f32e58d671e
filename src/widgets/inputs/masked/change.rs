use crate::widgets::inputs::text_edit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditOrigin {
    #[default]
    User,
    /// Value assigned by the application rather than typed.
    Programmatic,
}

/// A proposed edit of the field content, expressed in char indices.
///
/// `control_*` describe the field before the edit; `range_start..range_end` is the
/// slice of `control_text` replaced by `text`; `caret`/`anchor` are the proposed
/// selection after the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub control_text: String,
    pub control_caret: usize,
    pub control_anchor: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub text: String,
    pub caret: usize,
    pub anchor: usize,
    pub origin: EditOrigin,
}

impl Change {
    /// Replaces `range` of `control_text` with `text`, placing the caret after it.
    pub fn replace(
        control_text: impl Into<String>,
        control_caret: usize,
        range: std::ops::Range<usize>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let caret = range.start + text_edit::char_count(text.as_str());
        Self {
            control_text: control_text.into(),
            control_caret,
            control_anchor: control_caret,
            range_start: range.start,
            range_end: range.end,
            text,
            caret,
            anchor: caret,
            origin: EditOrigin::User,
        }
    }

    pub fn insert(control_text: impl Into<String>, at: usize, text: impl Into<String>) -> Self {
        Self::replace(control_text, at, at..at, text)
    }

    /// Deletes `range`; the caret lands on the start of the range.
    pub fn delete(
        control_text: impl Into<String>,
        control_caret: usize,
        range: std::ops::Range<usize>,
    ) -> Self {
        Self::replace(control_text, control_caret, range, String::new())
    }

    pub fn move_caret(
        control_text: impl Into<String>,
        control_caret: usize,
        caret: usize,
        anchor: usize,
    ) -> Self {
        Self {
            control_text: control_text.into(),
            control_caret,
            control_anchor: control_caret,
            range_start: 0,
            range_end: 0,
            text: String::new(),
            caret,
            anchor,
            origin: EditOrigin::User,
        }
    }

    pub fn with_control_anchor(mut self, anchor: usize) -> Self {
        self.control_anchor = anchor;
        self
    }

    pub fn with_origin(mut self, origin: EditOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_added(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn is_deleted(&self) -> bool {
        self.range_start < self.range_end
    }

    pub fn is_content_change(&self) -> bool {
        self.is_added() || self.is_deleted()
    }

    pub fn control_len(&self) -> usize {
        text_edit::char_count(self.control_text.as_str())
    }

    /// Field text if the edit were applied unchanged.
    pub fn control_new_text(&self) -> String {
        text_edit::replace_range(
            self.control_text.as_str(),
            self.range_start..self.range_end,
            self.text.as_str(),
        )
    }
}

/// An edit that is consistent with the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub range_start: usize,
    pub range_end: usize,
    pub text: String,
    pub caret: usize,
    pub anchor: usize,
}

impl EditResult {
    pub fn apply(&self, current: &str) -> String {
        text_edit::replace_range(current, self.range_start..self.range_end, self.text.as_str())
    }

    pub fn has_selection(&self) -> bool {
        self.caret != self.anchor
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Apply(EditResult),
    /// Leave the field content and caret untouched.
    Reject,
}

impl EditOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Reject)
    }

    pub fn into_result(self) -> Option<EditResult> {
        match self {
            Self::Apply(result) => Some(result),
            Self::Reject => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Change, EditResult};

    #[test]
    fn replace_places_caret_after_text() {
        let change = Change::replace("___-___", 0, 0..1, "12");
        assert_eq!(change.caret, 2);
        assert_eq!(change.anchor, 2);
        assert!(change.is_added());
        assert!(change.is_deleted());
        assert_eq!(change.control_new_text(), "12__-___");
    }

    #[test]
    fn delete_and_caret_moves() {
        let change = Change::delete("123-456", 4, 3..4);
        assert!(!change.is_added());
        assert!(change.is_deleted());
        assert_eq!(change.caret, 3);

        let moved = Change::move_caret("123-456", 2, 3, 3);
        assert!(!moved.is_content_change());
        assert_eq!(moved.control_new_text(), "123-456");
    }

    #[test]
    fn edit_result_applies_to_current_text() {
        let result = EditResult {
            range_start: 2,
            range_end: 4,
            text: "_-".to_string(),
            caret: 2,
            anchor: 2,
        };
        assert_eq!(result.apply("123-456"), "12_-456");
        assert!(!result.has_selection());
    }
}
