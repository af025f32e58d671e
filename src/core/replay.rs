use crate::core::config::MaskConfig;
use crate::terminal::{KeyCode, KeyEvent, KeyParseError};
use crate::widgets::inputs::masked::{ConfigurationError, FormatError, MaskedInput};
use crate::widgets::traits::Interactive;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Mask(#[from] ConfigurationError),
    #[error("step {step}: {source}")]
    Key {
        step: usize,
        #[source]
        source: KeyParseError,
    },
    #[error("step {step}: {source}")]
    Format {
        step: usize,
        #[source]
        source: FormatError,
    },
    #[error("step {step}: expected exactly one of key, type, paste, set or clear")]
    InvalidStep { step: usize },
}

/// A scripted editing session against one masked field.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(flatten)]
    pub mask: MaskConfig,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayStep {
    /// A single key, e.g. `Backspace` or `Shift+Left`.
    #[serde(default)]
    pub key: Option<String>,
    /// Characters typed one keystroke at a time.
    #[serde(default, rename = "type")]
    pub typed: Option<String>,
    #[serde(default)]
    pub paste: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub text: String,
    pub caret: usize,
    pub anchor: usize,
    pub raw: Option<String>,
    pub complete: bool,
    pub rejected: usize,
}

impl ReplayScript {
    pub fn run(&self) -> Result<ReplayReport, ReplayError> {
        let mut input = MaskedInput::from_config("replay", "replay", &self.mask)?;
        if let Some(value) = self.value.as_deref() {
            input
                .set_value(value)
                .map_err(|source| ReplayError::Format { step: 0, source })?;
        }

        for (idx, step) in self.steps.iter().enumerate() {
            run_step(&mut input, idx + 1, step)?;
        }

        Ok(ReplayReport {
            text: input.value().to_string(),
            caret: input.caret(),
            anchor: input.anchor(),
            raw: input.raw_value().ok(),
            complete: input.is_complete(),
            rejected: input.rejected_count(),
        })
    }
}

fn run_step(input: &mut MaskedInput, step: usize, action: &ReplayStep) -> Result<(), ReplayError> {
    let actions = [
        action.key.is_some(),
        action.typed.is_some(),
        action.paste.is_some(),
        action.set.is_some(),
        action.clear,
    ];
    if actions.iter().filter(|set| **set).count() != 1 {
        return Err(ReplayError::InvalidStep { step });
    }

    if let Some(key) = action.key.as_deref() {
        let key: KeyEvent = key
            .parse()
            .map_err(|source| ReplayError::Key { step, source })?;
        input.on_key(key);
    } else if let Some(typed) = action.typed.as_deref() {
        for ch in typed.chars() {
            input.on_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
    } else if let Some(text) = action.paste.as_deref() {
        input.paste(text);
    } else if let Some(value) = action.set.as_deref() {
        input
            .set_value(value)
            .map_err(|source| ReplayError::Format { step, source })?;
    } else {
        input.clear();
    }
    tracing::trace!(step, text = input.value(), caret = input.caret(), "replayed step");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ReplayError, ReplayScript};
    use crate::core::config::DocumentFormat;

    fn script(raw: &str) -> ReplayScript {
        DocumentFormat::Yaml.parse(raw).expect("script")
    }

    #[test]
    fn replays_typing_and_corrections() {
        let report = script(
            r#"
mask: '#####-###'
placeholder: "_"
steps:
  - type: "1234567"
  - key: Backspace
  - key: Backspace
  - key: Backspace
  - type: "9"
"#,
        )
        .run()
        .expect("run");
        assert_eq!(report.text, "12349-___");
        assert_eq!(report.caret, 6);
        assert_eq!(report.raw.as_deref(), Some("12349"));
        assert!(!report.complete);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn replays_initial_value_and_paste() {
        let report = script(
            r#"
mask: '(##)#-####-####'
value: "11987654321"
steps:
  - key: End
  - key: Shift+Home
  - paste: "21x"
"#,
        )
        .run()
        .expect("run");
        assert_eq!(report.text, "(11)9-8765-4321");
        assert!(report.complete);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn counts_rejected_keystrokes() {
        let report = script("mask: 'UU'\nsteps:\n  - type: 'a1b'\n").run().expect("run");
        assert_eq!(report.text, "AB");
        assert_eq!(report.rejected, 1);
        assert!(report.complete);
    }

    #[test]
    fn invalid_steps_are_reported() {
        let err = script("mask: '##'\nsteps:\n  - {}\n").run().expect_err("empty step");
        assert!(matches!(err, ReplayError::InvalidStep { step: 1 }));

        let err = script("mask: '##'\nsteps:\n  - key: Hyper+x\n").run().expect_err("bad key");
        assert!(matches!(err, ReplayError::Key { step: 1, .. }));

        let err = script("mask: '##'\nsteps:\n  - set: 'xy'\n")
            .run()
            .expect_err("bad value");
        assert!(matches!(err, ReplayError::Format { step: 1, .. }));

        let report = script("mask: '##'\nsteps:\n  - clear: true\n  - set: 'xy'\n")
            .run()
            .expect("populated field refuses silently");
        assert_eq!(report.rejected, 1);
    }
}
