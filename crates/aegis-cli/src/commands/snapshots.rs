use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aegis snapshots`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snapshots = ctx.cache.list().await.context("failed to list snapshots")?;
    output(&snapshots, flags.format)
}
