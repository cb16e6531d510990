mod authenticator;
pub mod db;
mod ledger;
mod password;
mod rate_limit;
mod services;
mod store;

pub use authenticator::*;
pub use ledger::FailedLoginLedger;
pub use password::{Argon2PasswordVerifier, PasswordCheck};
pub use rate_limit::*;
pub use services::{directory_for, Services};
pub use store::*;
