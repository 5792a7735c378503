//! List command - show the secrets in an environment.

use crate::cli::{output, Context};
use crate::error::Result;

/// List secrets in `env`, or in the project binding's environment.
pub async fn execute(ctx: &Context, env: Option<String>) -> Result<()> {
    let env_id = match env {
        Some(env) => env,
        None => ctx.store.binding()?.env_id,
    };

    let secrets = ctx.api()?.list(&env_id).await?;
    if secrets.is_empty() {
        output::dimmed(&format!("no secrets in {}", env_id));
        return Ok(());
    }

    for secret in secrets {
        let version = secret
            .version
            .map(|v| format!("v{}", v))
            .unwrap_or_else(|| "-".to_string());
        output::kv(&secret.id, format!("{}  {}", version, secret.updated_at));
    }
    Ok(())
}
