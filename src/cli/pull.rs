//! Pull command - fetch a secret and print its decrypted values.

use tracing::debug;

use crate::cli::{output, Context, Format};
use crate::error::Result;

/// Fetch, decrypt and print a secret.
pub async fn execute(ctx: &Context, secret_id: &str, format: Format) -> Result<()> {
    let org_key = ctx.org_key()?;
    let api = ctx.api()?;

    let secret = api.pull(secret_id).await?;
    let plain = secret.decrypted(&org_key)?;
    debug!(secret = %plain, values = plain.keys().len(), "pulled secret");

    if plain.is_empty() {
        output::dimmed(&format!("{} has no values", secret_id));
    }

    let values = plain.to_kv_map();
    match format {
        Format::Env => output::data(&values.to_dotenv()),
        Format::Json => output::data(&values.to_json()),
    }
    Ok(())
}
