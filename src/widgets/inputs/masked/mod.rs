mod caret;
mod change;
mod error;
mod filter;
mod format;
mod model;
mod parser;

pub use caret::{CaretMove, correct as correct_caret};
pub use change::{Change, EditOrigin, EditOutcome, EditResult};
pub use error::{ConfigurationError, FormatError};
pub use filter::MaskFilter;
pub use format::MaskFormatter;
pub use model::{CompiledMask, DEFAULT_PLACEHOLDER, ESCAPE, MaskPosition, MaskSymbol, SlotKind};
pub use parser::compile;

use crate::core::config::MaskConfig;
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers};
use crate::widgets::base::InputBase;
use crate::widgets::inputs::text_edit;
use crate::widgets::traits::{InteractionResult, Interactive};
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

/// A single-line field whose every edit is routed through a [`MaskFilter`].
///
/// The field starts unpopulated (empty text) like a fresh text control; the first
/// programmatic value goes through the formatter, the first keystroke or caret move
/// fills it with the empty mask.
#[derive(Debug, Clone)]
pub struct MaskedInput {
    base: InputBase,
    filter: MaskFilter,
    text: String,
    caret: usize,
    anchor: usize,
    rejected: usize,
}

impl MaskedInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>, filter: MaskFilter) -> Self {
        Self {
            base: InputBase::new(id, label),
            filter,
            text: String::new(),
            caret: 0,
            anchor: 0,
            rejected: 0,
        }
    }

    pub fn from_config(
        id: impl Into<String>,
        label: impl Into<String>,
        config: &MaskConfig,
    ) -> Result<Self, ConfigurationError> {
        let filter = MaskFilter::new(config.mask.as_str(), config.placeholder)?;
        Ok(Self::new(id, label, filter))
    }

    pub fn with_default(mut self, value: &str) -> Result<Self, FormatError> {
        self.set_value(value)?;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    pub fn label(&self) -> &str {
        self.base.label()
    }

    pub fn prefixed_label(&self, focused: bool) -> String {
        self.base.prefixed_label(focused)
    }

    pub fn filter(&self) -> &MaskFilter {
        &self.filter
    }

    /// Raw field text; empty until the field is first populated.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Text as shown to the user.
    pub fn value(&self) -> &str {
        if self.text.is_empty() {
            self.filter.empty_mask()
        } else {
            self.text.as_str()
        }
    }

    pub fn raw_value(&self) -> Result<String, FormatError> {
        self.filter.formatter().string_to_value(self.value())
    }

    pub fn is_complete(&self) -> bool {
        self.filter.mask().is_complete(self.value())
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn selection(&self) -> Range<usize> {
        self.caret.min(self.anchor)..self.caret.max(self.anchor)
    }

    /// Number of edits the mask refused since construction.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    /// Programmatic assignment. Returns `Ok(false)` when the mask refused the value.
    pub fn set_value(&mut self, value: &str) -> Result<bool, FormatError> {
        let len = self.len();
        let change = Change::replace(self.text.as_str(), self.caret, 0..len, value)
            .with_control_anchor(self.anchor)
            .with_origin(EditOrigin::Programmatic);
        self.apply_change(&change)
    }

    pub fn clear(&mut self) -> bool {
        let len = self.len();
        let change = Change::replace(self.text.as_str(), self.caret, 0..len, "")
            .with_control_anchor(self.anchor);
        self.apply_user_change(&change)
    }

    pub fn paste(&mut self, text: &str) -> bool {
        let change = Change::replace(self.text.as_str(), self.caret, self.selection(), text)
            .with_control_anchor(self.anchor);
        self.apply_user_change(&change)
    }

    pub fn select_all(&mut self) -> bool {
        let len = self.len();
        self.move_to(len, 0)
    }

    fn len(&self) -> usize {
        text_edit::char_count(self.text.as_str())
    }

    fn insert_char(&mut self, ch: char) -> bool {
        self.paste(ch.encode_utf8(&mut [0u8; 4]))
    }

    fn delete_prev(&mut self) -> bool {
        let selection = self.selection();
        let range = if !selection.is_empty() {
            selection
        } else if self.caret > 0 {
            self.caret - 1..self.caret
        } else {
            return false;
        };
        self.delete_range(range)
    }

    fn delete_next(&mut self) -> bool {
        let selection = self.selection();
        let range = if !selection.is_empty() {
            selection
        } else if self.caret < self.len() {
            self.caret..self.caret + 1
        } else {
            return false;
        };
        self.delete_range(range)
    }

    fn delete_range(&mut self, range: Range<usize>) -> bool {
        let change =
            Change::delete(self.text.as_str(), self.caret, range).with_control_anchor(self.anchor);
        self.apply_user_change(&change)
    }

    fn move_left(&mut self, extend: bool) -> bool {
        let selection = self.selection();
        let caret = if !extend && !selection.is_empty() {
            selection.start
        } else {
            self.caret.saturating_sub(1)
        };
        self.move_caret(caret, extend)
    }

    fn move_right(&mut self, extend: bool) -> bool {
        let selection = self.selection();
        let caret = if !extend && !selection.is_empty() {
            selection.end
        } else {
            (self.caret + 1).min(self.len())
        };
        self.move_caret(caret, extend)
    }

    fn move_caret(&mut self, caret: usize, extend: bool) -> bool {
        let anchor = if extend { self.anchor } else { caret };
        self.move_to(caret, anchor)
    }

    fn move_to(&mut self, caret: usize, anchor: usize) -> bool {
        if self.text.is_empty() || caret != self.caret || anchor != self.anchor {
            let change = Change::move_caret(self.text.as_str(), self.caret, caret, anchor)
                .with_control_anchor(self.anchor);
            return self.apply_user_change(&change);
        }
        false
    }

    fn apply_user_change(&mut self, change: &Change) -> bool {
        match self.apply_change(change) {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!(field = self.base.id(), error = %err, "edit failed");
                false
            }
        }
    }

    fn apply_change(&mut self, change: &Change) -> Result<bool, FormatError> {
        match self.filter.filter(change)? {
            EditOutcome::Apply(result) => {
                self.text = result.apply(self.text.as_str());
                let len = self.len();
                self.caret = result.caret.min(len);
                self.anchor = result.anchor.min(len);
                Ok(true)
            }
            EditOutcome::Reject => {
                self.rejected += 1;
                tracing::debug!(
                    field = self.base.id(),
                    text = change.text.as_str(),
                    "edit rejected by mask"
                );
                Ok(false)
            }
        }
    }

    /// Display column of the caret, accounting for wide characters.
    pub fn cursor_col(&self) -> usize {
        self.value()
            .chars()
            .take(self.caret)
            .map(|ch| ch.width().unwrap_or(0))
            .sum()
    }
}

impl Interactive for MaskedInput {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let changed = match key.code {
            KeyCode::Char('a') | KeyCode::Char('A')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.select_all()
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return InteractionResult::ignored();
            }
            KeyCode::Char(ch) => {
                if !self.insert_char(ch) {
                    // Refused keystrokes are swallowed so the host does not act on them.
                    return InteractionResult::consumed();
                }
                true
            }
            KeyCode::Backspace => self.delete_prev(),
            KeyCode::Delete => self.delete_next(),
            KeyCode::Left => self.move_left(extend),
            KeyCode::Right => self.move_right(extend),
            KeyCode::Home => self.move_caret(0, extend),
            KeyCode::End => {
                let len = self.len();
                self.move_caret(len, extend)
            }
            _ => return InteractionResult::ignored(),
        };

        if changed {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        Some(CursorPos {
            col: self.cursor_col() as u16,
            row: 0,
        })
    }
}
