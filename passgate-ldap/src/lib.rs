mod connection;
mod directory;
mod error;
mod queries;
mod types;

pub use connection::{bind_as, connect, test_connection};
pub use directory::{Directory, LdapDirectory};
pub use error::{LdapError, Result};
pub use queries::find_user_by_cn;
pub use types::{BasicUserInfo, LdapConfig, LdapUser, TlsMode};
