#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

pub const DEFAULT_SPECIES_COUNT: u32 = 1025;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
