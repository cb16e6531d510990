mod config;
mod error;
pub mod helpers;
pub mod time;
mod types;

pub use config::*;
pub use error::PassgateError;
pub use types::*;
