use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn progress(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx
        .engine
        .progress(id)
        .await
        .with_context(|| format!("failed to compute progress for {id}"))?;
    output(&report, flags.format)
}

pub async fn maturity(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx
        .engine
        .maturity_report(id)
        .await
        .with_context(|| format!("failed to compute maturity for {id}"))?;
    output(&report, flags.format)
}

pub async fn show(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let overview = ctx
        .engine
        .overview(id)
        .await
        .with_context(|| format!("failed to load assessment {id}"))?;
    output(&overview, flags.format)
}

pub async fn list(org_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let assessments = ctx
        .service
        .list_assessments(org_id)
        .await
        .with_context(|| format!("failed to list assessments for {org_id}"))?;
    output(&assessments, flags.format)
}
