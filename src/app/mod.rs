pub mod report;
pub mod session;

pub use session::Session;
