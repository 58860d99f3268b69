use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn complete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let assessment = ctx
        .engine
        .complete_assessment(id)
        .await
        .with_context(|| format!("failed to complete assessment {id}"))?;
    output(&assessment, flags.format)
}

pub async fn archive(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let assessment = ctx
        .engine
        .archive_assessment(id)
        .await
        .with_context(|| format!("failed to archive assessment {id}"))?;
    output(&assessment, flags.format)
}
