//! Push command - encrypt a .env file and upload it.

use std::path::Path;

use crate::cli::{output, Context};
use crate::core::domain::{KPMap, KVMap, Payload, Secret};
use crate::core::store::CredentialStore;
use crate::error::{ClientError, Error, Result};

/// Replace the values of `secret_id` with the contents of `file`.
///
/// An existing secret keeps its id, owner and version history; its old
/// values are replaced without being opened. A secret the server does not
/// know yet is created in the project binding's environment.
pub async fn execute(
    ctx: &Context,
    secret_id: &str,
    file: &Path,
    exposable: &[String],
) -> Result<()> {
    let values = KVMap::load_dotenv(file)?;
    let org_key = ctx.org_key()?;
    let api = ctx.api()?;

    let existing = match api.pull(secret_id).await {
        Ok(remote) => Some(remote),
        Err(Error::Client(ClientError::Status { status: 404, .. })) => None,
        Err(e) => return Err(e),
    };
    let secret = match existing {
        Some(remote) => remote,
        None => new_secret(ctx.store.as_ref(), secret_id)?,
    };

    let data = KPMap::from(&values);
    for key in exposable {
        data.update(key, Payload::mark_exposable)?;
    }

    let mut secret = secret.with_data(data);
    let stored = api.push(&mut secret, &org_key).await?;

    output::success(&format!(
        "pushed {} values to {}",
        values.len(),
        output::key(&stored.to_string())
    ));
    Ok(())
}

fn new_secret(store: &dyn CredentialStore, secret_id: &str) -> Result<Secret> {
    let session = store.session()?;
    let binding = store.binding()?;
    output::warn(&format!(
        "{} does not exist yet, creating it in {}",
        secret_id, binding.env_id
    ));
    Ok(Secret::new(secret_id, session.user.id, binding.env_id))
}
