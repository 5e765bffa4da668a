pub mod core;
pub mod app;
pub mod api;
pub mod envconfig;
pub mod middleware;
pub mod rng;

pub use crate::core::{
    annotate, ColoredToken, Dispatcher, PastelPalette, Rgb, Scheme, SchemeOutcome, SchemeStatus,
    TokenizerBackend, Result,
};

pub use app::{create_router, AppState, Server};

pub use api::Client;
