use super::caret::{self, CaretMove};
use super::change::{Change, EditOrigin, EditOutcome, EditResult};
use super::error::{ConfigurationError, FormatError};
use super::format::MaskFormatter;
use super::model::{CompiledMask, DEFAULT_PLACEHOLDER, SlotKind};
use super::parser;

/// Rewrites proposed edits of a text field so its content always follows the mask.
#[derive(Debug, Clone)]
pub struct MaskFilter {
    mask: CompiledMask,
    formatter: MaskFormatter,
}

impl MaskFilter {
    pub fn new(template: &str, placeholder: char) -> Result<Self, ConfigurationError> {
        parser::compile(template, placeholder).map(Self::from_mask)
    }

    pub fn with_default_placeholder(template: &str) -> Result<Self, ConfigurationError> {
        Self::new(template, DEFAULT_PLACEHOLDER)
    }

    pub fn from_mask(mask: CompiledMask) -> Self {
        let formatter = MaskFormatter::new(mask.clone());
        Self { mask, formatter }
    }

    pub fn mask(&self) -> &CompiledMask {
        &self.mask
    }

    pub fn formatter(&self) -> &MaskFormatter {
        &self.formatter
    }

    pub fn empty_mask(&self) -> &str {
        self.mask.empty_mask()
    }

    /// Only initial programmatic population can fail; every other edit is either
    /// adjusted or rejected.
    pub fn filter(&self, change: &Change) -> Result<EditOutcome, FormatError> {
        tracing::trace!(
            mask = self.mask.template(),
            range_start = change.range_start,
            range_end = change.range_end,
            text = change.text.as_str(),
            caret = change.caret,
            "filtering change"
        );

        if change.control_new_text().is_empty() {
            return Ok(EditOutcome::Apply(EditResult {
                range_start: 0,
                range_end: change.control_len(),
                text: self.mask.empty_mask().to_string(),
                caret: 0,
                anchor: 0,
            }));
        }

        if change.control_text.is_empty() {
            if change.origin == EditOrigin::Programmatic {
                let text = self.formatter.value_to_string(change.text.as_str())?;
                return Ok(EditOutcome::Apply(EditResult {
                    range_start: 0,
                    range_end: 0,
                    text,
                    caret: 0,
                    anchor: 0,
                }));
            }
            return Ok(self.adjust_on_empty_mask(change));
        }

        Ok(self.adjust(change))
    }

    // A field that was never populated behaves as if it showed the empty mask.
    fn adjust_on_empty_mask(&self, change: &Change) -> EditOutcome {
        let empty_mask = self.mask.empty_mask();
        let rebased = Change {
            control_text: empty_mask.to_string(),
            ..change.clone()
        };
        match self.adjust(&rebased) {
            EditOutcome::Apply(result) => EditOutcome::Apply(EditResult {
                range_start: 0,
                range_end: 0,
                text: result.apply(empty_mask),
                caret: result.caret,
                anchor: result.anchor,
            }),
            EditOutcome::Reject => EditOutcome::Reject,
        }
    }

    fn adjust(&self, change: &Change) -> EditOutcome {
        if change.is_added() {
            self.adjust_added(change)
        } else if change.is_deleted() {
            EditOutcome::Apply(self.adjust_deleted(change))
        } else {
            let (caret, anchor) = self.correct_caret(change, change.caret, change.anchor);
            EditOutcome::Apply(EditResult {
                range_start: change.range_start,
                range_end: change.range_end,
                text: String::new(),
                caret,
                anchor,
            })
        }
    }

    fn adjust_added(&self, change: &Change) -> EditOutcome {
        let max_len = self.mask.max_len();
        let placeholder = self.mask.placeholder();
        let input: Vec<char> = change.text.chars().collect();
        let start = change.range_start.min(max_len);

        let mut out = String::new();
        let mut produced = 0usize;
        let mut pos = start;
        let mut next_input = 0usize;
        let mut free_literals = 0usize;

        while let Some(position) = self.mask.position(pos) {
            if let Some(&raw) = input.get(next_input) {
                match position.kind {
                    SlotKind::Fixed(literal) => {
                        if raw == literal {
                            next_input += 1;
                            free_literals = 0;
                        } else {
                            free_literals += 1;
                            if free_literals > 1 {
                                tracing::debug!(
                                    mask = self.mask.template(),
                                    position = pos,
                                    "consecutive literals consumed without input"
                                );
                            }
                        }
                        out.push(literal);
                    }
                    SlotKind::Variable(symbol) if symbol.accepts(symbol.transform(raw)) => {
                        out.push(symbol.transform(raw));
                        next_input += 1;
                        free_literals = 0;
                    }
                    SlotKind::Variable(_) | SlotKind::Blank => {
                        tracing::debug!(
                            mask = self.mask.template(),
                            position = pos,
                            ch = %raw,
                            "rejected character"
                        );
                        return EditOutcome::Reject;
                    }
                }
            } else if pos < change.range_end {
                out.push(position.blank(placeholder));
            } else {
                break;
            }
            pos += 1;
            produced += 1;
        }

        let end = max_len.min(start + produced);
        let (caret, anchor) = self.correct_caret(change, end, end);
        EditOutcome::Apply(EditResult {
            range_start: start,
            range_end: end,
            text: out,
            caret,
            anchor,
        })
    }

    fn adjust_deleted(&self, change: &Change) -> EditResult {
        let placeholder = self.mask.placeholder();
        let single = change.range_end - change.range_start == 1;
        let end = change.range_end.min(self.mask.max_len());
        let start = change.range_start.min(end);

        let mut reversed = Vec::<char>::new();
        let mut remaining = end - start;
        let mut idx = end;
        while remaining > 0 && idx > 0 {
            idx -= 1;
            let Some(position) = self.mask.position(idx) else {
                break;
            };
            match position.kind {
                // A lone literal cannot be deleted; clear the slot before it instead.
                SlotKind::Fixed(literal) => {
                    reversed.push(literal);
                    if !single {
                        remaining -= 1;
                    }
                }
                SlotKind::Variable(_) | SlotKind::Blank => {
                    reversed.push(placeholder);
                    remaining -= 1;
                }
            }
        }

        let text: String = reversed.into_iter().rev().collect();
        let written = text.chars().count();
        let range_start = end - written;
        let (caret, anchor) = if single {
            (
                change.control_caret.saturating_sub(written),
                change.control_anchor.saturating_sub(written),
            )
        } else {
            (change.caret, change.anchor)
        };
        let (caret, anchor) = self.correct_caret(change, caret, anchor);

        EditResult {
            range_start,
            range_end: end,
            text,
            caret,
            anchor,
        }
    }

    fn correct_caret(&self, change: &Change, caret: usize, anchor: usize) -> (usize, usize) {
        caret::correct(
            &self.mask,
            CaretMove {
                from: change.control_caret,
                field_len: change.control_len(),
                caret,
                anchor,
            },
        )
    }
}
