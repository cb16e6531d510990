#![allow(non_snake_case)]

pub mod Account;
pub mod FailedLoginUsername;
