use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RetireOutput<'a> {
    code: &'a str,
    removed: bool,
}

/// Handle `aegis retire`.
pub async fn handle(code: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let removed = ctx
        .builder
        .retire(code)
        .await
        .with_context(|| format!("failed to retire snapshot for {code}"))?;
    output(&RetireOutput { code, removed }, flags.format)
}
