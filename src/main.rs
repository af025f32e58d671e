use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use steply_mask::config::{ConfigError, FormConfig, MaskConfig, load_document};
use steply_mask::masked::{ConfigurationError, FormatError, MaskedInput};
use steply_mask::replay::{ReplayError, ReplayScript};
use steply_mask::terminal::{CursorPos, KeyCode, KeyModifiers, Terminal, TerminalEvent};
use steply_mask::widgets::traits::Interactive;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Parser)]
#[command(name = "steply-mask", version, about = "Masked input fields for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct MaskArgs {
    /// Mask template, e.g. "###.###.###-##"
    #[arg(long, short)]
    mask: String,
    #[arg(long, short, default_value_t = ' ')]
    placeholder: char,
}

impl MaskArgs {
    fn config(&self) -> MaskConfig {
        MaskConfig::new(self.mask.clone(), self.placeholder)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the blank rendering of a mask.
    Empty(MaskArgs),
    /// Format a raw value with a mask.
    Format {
        #[command(flatten)]
        mask: MaskArgs,
        /// The value already contains the mask literals.
        #[arg(long)]
        with_literals: bool,
        value: String,
    },
    /// Strip a masked display string back to its raw value.
    Unformat {
        #[command(flatten)]
        mask: MaskArgs,
        #[arg(long)]
        with_literals: bool,
        text: String,
    },
    /// Run a YAML/JSON key script against a field and print the result as JSON.
    Replay { script: PathBuf },
    /// Edit a form of masked fields interactively.
    Edit {
        /// YAML/JSON form definition; defaults to the CPF/CEP/phone demo form.
        #[arg(long)]
        form: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Mask(#[from] ConfigurationError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    steply_mask::logging::init();
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Empty(mask) => {
            let filter = mask.config().build()?;
            println!("{}", filter.empty_mask());
        }
        Command::Format {
            mask,
            with_literals,
            value,
        } => {
            let filter = mask.config().build()?;
            let formatter = filter
                .formatter()
                .clone()
                .with_value_contains_literals(with_literals);
            println!("{}", formatter.value_to_string(value.as_str())?);
        }
        Command::Unformat {
            mask,
            with_literals,
            text,
        } => {
            let filter = mask.config().build()?;
            let formatter = filter
                .formatter()
                .clone()
                .with_value_contains_literals(with_literals);
            println!("{}", formatter.string_to_value(text.as_str())?);
        }
        Command::Replay { script } => {
            let script: ReplayScript = load_document(&script)?;
            let report = script.run()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Edit { form } => {
            let form = match form {
                Some(path) => FormConfig::load(&path)?,
                None => FormConfig::demo(),
            };
            let mut inputs = form.build()?;
            if let Some(values) = edit_form(&mut inputs)? {
                println!("{}", serde_json::to_string_pretty(&values)?);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct FieldValue {
    text: String,
    raw: Option<String>,
    complete: bool,
}

/// Returns `None` when the user aborted with Ctrl+C.
fn edit_form(inputs: &mut [MaskedInput]) -> io::Result<Option<IndexMap<String, FieldValue>>> {
    if inputs.is_empty() {
        return Ok(Some(IndexMap::new()));
    }

    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    let result = event_loop(&mut terminal, inputs);
    let cleared = terminal.move_to_end();
    terminal.exit_raw_mode()?;
    cleared?;

    let submitted = result?;
    Ok(submitted.then(|| {
        inputs
            .iter()
            .map(|input| {
                let value = FieldValue {
                    text: input.value().to_string(),
                    raw: input.raw_value().ok(),
                    complete: input.is_complete(),
                };
                (input.id().to_string(), value)
            })
            .collect()
    }))
}

fn event_loop(terminal: &mut Terminal, inputs: &mut [MaskedInput]) -> io::Result<bool> {
    let label_width = inputs
        .iter()
        .map(|input| input.prefixed_label(false).width())
        .max()
        .unwrap_or(0);
    let mut focused = 0usize;
    let mut render_requested = true;

    loop {
        if render_requested {
            render(terminal, inputs, focused, label_width)?;
            render_requested = false;
        }

        if !terminal.poll(Duration::from_millis(100))? {
            continue;
        }
        let TerminalEvent::Key(key) = terminal.read_event()? else {
            render_requested = true;
            continue;
        };

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(false);
            }
            KeyCode::Esc => return Ok(true),
            KeyCode::Enter if focused + 1 == inputs.len() => return Ok(true),
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                focused = (focused + 1) % inputs.len();
                render_requested = true;
            }
            KeyCode::BackTab | KeyCode::Up => {
                focused = (focused + inputs.len() - 1) % inputs.len();
                render_requested = true;
            }
            _ => {
                if inputs[focused].on_key(key).request_render {
                    render_requested = true;
                }
            }
        }
    }
}

fn render(
    terminal: &mut Terminal,
    inputs: &[MaskedInput],
    focused: usize,
    label_width: usize,
) -> io::Result<()> {
    let lines: Vec<Vec<(String, bool)>> = inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let label = format!(
                "{:<width$}  ",
                input.prefixed_label(idx == focused),
                width = label_width
            );
            let mut pieces = vec![(label, false)];
            pieces.extend(field_pieces(input));
            pieces
        })
        .collect();
    terminal.render_lines(&lines)?;

    let prefix = label_width + 2;
    let col = inputs[focused]
        .cursor_pos()
        .map(|pos| pos.col as usize)
        .unwrap_or(0);
    terminal.place_cursor(CursorPos {
        col: (prefix + col) as u16,
        row: focused as u16,
    })?;
    terminal.flush()
}

/// Unfilled slots are drawn dim.
fn field_pieces(input: &MaskedInput) -> Vec<(String, bool)> {
    let mask = input.filter().mask();
    input
        .value()
        .chars()
        .zip(mask.positions())
        .map(|(ch, position)| {
            let blank = position.is_variable() && ch == mask.placeholder();
            (ch.to_string(), blank)
        })
        .collect()
}
