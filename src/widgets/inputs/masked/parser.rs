use super::error::ConfigurationError;
use super::model::{CompiledMask, ESCAPE, MaskPosition, MaskSymbol, SlotKind};

pub fn compile(template: &str, placeholder: char) -> Result<CompiledMask, ConfigurationError> {
    if template.is_empty() {
        return Err(ConfigurationError::EmptyTemplate);
    }
    if placeholder == ESCAPE {
        return Err(ConfigurationError::EscapePlaceholder);
    }

    let mut positions = Vec::<MaskPosition>::new();
    let mut in_escape = false;
    let mut escape_start = 0usize;

    for (idx, ch) in template.chars().enumerate() {
        if ch == ESCAPE {
            if !in_escape {
                escape_start = idx;
            }
            in_escape = !in_escape;
            continue;
        }

        let kind = if in_escape {
            SlotKind::Fixed(ch)
        } else if ch == placeholder {
            SlotKind::Blank
        } else {
            match MaskSymbol::from_char(ch) {
                Some(symbol) => SlotKind::Variable(symbol),
                None => SlotKind::Fixed(ch),
            }
        };

        positions.push(MaskPosition {
            symbol: ch,
            index: positions.len(),
            kind,
            is_first: positions.is_empty(),
            is_last: false,
        });
    }

    if in_escape {
        return Err(ConfigurationError::UnterminatedEscape {
            start: escape_start,
        });
    }
    let Some(last) = positions.last_mut() else {
        return Err(ConfigurationError::NoPositions);
    };
    last.is_last = true;

    let empty_mask: String = positions
        .iter()
        .map(|position| position.blank(placeholder))
        .collect();

    Ok(CompiledMask::from_parts(
        template.to_string(),
        placeholder,
        positions,
        empty_mask,
    ))
}
