use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    framework_code: &str,
    org_id: &str,
    name: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let framework = ctx
        .service
        .framework_by_code(framework_code)
        .await?
        .with_context(|| format!("framework {framework_code} not found"))?;

    let assessment = ctx
        .engine
        .create_assessment(org_id, &framework.id, name)
        .await
        .context("failed to create assessment")?;
    output(&assessment, flags.format)
}
