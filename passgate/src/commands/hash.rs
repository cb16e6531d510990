use anyhow::Result;
use passgate_common::helpers::hash::hash_password;

use super::common::read_password;

pub(crate) async fn command() -> Result<()> {
    let input = read_password("Password to be hashed")?;
    if input.is_empty() {
        anyhow::bail!("Refusing to hash an empty password");
    }
    let hash = hash_password(&input);
    println!("{hash}");
    Ok(())
}
