pub mod derive;
pub mod identifier;
pub mod resolver;
pub mod store;

pub use crate::domain::model::{
    HeldItemReference, PokemonQuery, PrimaryRecord, ResolvedHeldItem, ThemePair,
};
pub use crate::domain::ports::{Calendar, ConfigProvider, PokemonCatalog, RandomSource};
pub use crate::utils::error::Result;
