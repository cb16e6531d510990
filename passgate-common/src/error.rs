use std::error::Error;

use passgate_ldap::LdapError;

/// Infrastructure faults. Authentication outcomes are never reported
/// through this type.
#[derive(thiserror::Error, Debug)]
pub enum PassgateError {
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    #[error("directory error: {0}")]
    Directory(#[from] LdapError),
    #[error("another account already uses this {0}")]
    DuplicateAccount(&'static str),
    #[error("the {0} of an existing account cannot be changed")]
    ImmutableField(&'static str),
    #[error("account {0} not found")]
    AccountNotFound(uuid::Uuid),
    #[error("refusing to persist the stand-in account")]
    StandInAccount,
    #[error("failed to parse URL: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("deserialization failed: {0}")]
    DeserializeJson(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl PassgateError {
    pub fn other<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Other(Box::new(err))
    }
}
