pub mod server;

pub use server::{create_router, ApiError, AppState, Server};

pub type Result<T> = anyhow::Result<T>;
