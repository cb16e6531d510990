use thiserror::Error;

pub type Result<T> = std::result::Result<T, LdapError>;

/// Directory faults. A user's rejected password is not one of them.
#[derive(Error, Debug)]
pub enum LdapError {
    #[error("could not reach the directory: {0}")]
    ConnectionFailed(String),

    #[error("the directory rejected the service account: {0}")]
    ServiceBindFailed(String),

    #[error("directory search failed: {0}")]
    QueryFailed(String),

    #[error("invalid directory configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Client(#[from] ldap3::LdapError),
}
