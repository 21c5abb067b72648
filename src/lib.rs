pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{PokeApiClient, SystemRandom};
pub use app::Session;
pub use core::store::{LoadOutcome, Snapshot, ViewModelStore};
pub use utils::error::{AppError, FetchError, HeldItemsError, ItemFetchError, Result};
