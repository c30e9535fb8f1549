pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::ServerConfig;

#[cfg(feature = "postgres")]
pub use adapters::PostgresStore;

pub use adapters::{HtmlRenderer, MemoryStore};
pub use core::{Bar, BarPatch, BarService};
pub use server::{create_app, run_server, state::AppState};
pub use utils::error::{BarError, Result, StoreError};
