pub mod tokenizer;
pub mod color;

pub use tokenizer::{
    BackendSlot, Dispatcher, Scheme, SchemeError, SchemeOutcome, SchemeStatus, TokenizerBackend,
};
pub use color::{annotate, ColoredToken, PastelPalette, Rgb};

pub type Result<T> = anyhow::Result<T>;
