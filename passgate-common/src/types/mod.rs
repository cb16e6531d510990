mod account;
mod secret;
mod wait_time;

pub use account::*;
pub use secret::Secret;
pub use wait_time::{WaitTime, WaitUnit};
