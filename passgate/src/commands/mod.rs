pub mod check;
mod common;
pub mod hash;
pub mod login;
pub mod lookup;
pub mod status;
