use crate::adapters::DEFAULT_API_BASE;
use crate::config::{DEFAULT_SPECIES_COUNT, DEFAULT_TIMEOUT_SECONDS};
use crate::core::identifier::FAVORITE_ID;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pokeview")]
#[command(about = "Show a random pokemon, the pokemon of the day, or a favorite")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, default_value_t = DEFAULT_SPECIES_COUNT, help = "Fallback species count when the catalog cannot report one")]
    pub species_count: u32,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = FAVORITE_ID)]
    pub favorite: u32,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Show a random pokemon
    Random,
    /// Show the pokemon of the day
    Daily {
        #[arg(long, help = "Use this date (YYYY-MM-DD) instead of today")]
        date: Option<NaiveDate>,
    },
    /// Show the favorite pokemon
    Favorite,
    /// Show a pokemon by name or id
    Show { name_or_id: String },
    /// Read `random`, `daily`, `favorite` or a name from stdin, one per line
    Session,
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn species_count(&self) -> u32 {
        self.species_count
    }

    fn favorite_id(&self) -> u32 {
        self.favorite
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_positive_number("species_count", u64::from(self.species_count), 1)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_range("favorite", self.favorite, 1, self.species_count)?;
        self.command.validate()
    }
}

impl Validate for Command {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Show { name_or_id } => validate_non_empty_string("name_or_id", name_or_id),
            Self::Random | Self::Daily { .. } | Self::Favorite | Self::Session => Ok(()),
        }
    }
}
