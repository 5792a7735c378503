//! Logout command - forget the stored session and keys.

use crate::cli::{output, Context};
use crate::core::store::CredentialKind;
use crate::error::Result;

/// Delete the account session and keys. The project binding is kept.
pub fn execute(ctx: &Context) -> Result<()> {
    if !ctx.store.exists(CredentialKind::AccountSession) {
        output::dimmed("not signed in");
        return Ok(());
    }

    ctx.store.delete(CredentialKind::AccountSession)?;
    ctx.store.delete(CredentialKind::AsymmetricKeys)?;
    output::success("signed out");
    Ok(())
}
