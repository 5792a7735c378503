//! Whoami command - show the signed-in account.

use crate::cli::{output, Context};
use crate::core::store::CredentialKind;
use crate::error::Result;

/// Print the stored account and public key.
pub fn execute(ctx: &Context) -> Result<()> {
    let session = ctx.store.session()?;

    output::kv("user:", &session.user.id);
    if !session.user.email.is_empty() {
        output::kv("email:", &session.user.email);
    }
    if ctx.store.exists(CredentialKind::AsymmetricKeys) {
        output::kv("public key:", ctx.store.keys()?.public_key);
    }
    if let Ok(binding) = ctx.store.binding() {
        output::kv("secret:", format!("{} ({})", binding.secret_id, binding.env_id));
    }
    Ok(())
}
