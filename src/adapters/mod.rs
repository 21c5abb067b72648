// Adapters layer: concrete implementations of the domain ports (http catalog, randomness, calendar).

pub mod http;
pub mod system;

pub use http::{PokeApiClient, DEFAULT_API_BASE};
pub use system::{FixedCalendar, LocalCalendar, SystemRandom};
