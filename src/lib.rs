pub mod core;
pub mod logging;
pub mod terminal;
pub mod widgets;

pub use core::config;
pub use core::replay;

pub use widgets::inputs::masked;
pub use widgets::inputs::masked::{
    Change, CompiledMask, ConfigurationError, EditOrigin, EditOutcome, EditResult, FormatError,
    MaskFilter, MaskFormatter, MaskedInput, compile,
};
pub use widgets::inputs::text_edit;
