use anyhow::Context;
use serde::Serialize;

use aegis_snapshot::PublishReport;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PublishArgs;
use crate::context::AppContext;
use crate::output::output;

/// One framework's line in `publish --all` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishLine {
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<PublishReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Handle `aegis publish`.
pub async fn handle(args: &PublishArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(code) = &args.code {
        let report = ctx
            .builder
            .publish(code)
            .await
            .with_context(|| format!("failed to publish {code}"))?;
        return output(&report, flags.format);
    }

    let outcomes = ctx
        .builder
        .publish_all()
        .await
        .context("failed to list published frameworks")?;

    let mut failed = 0usize;
    let lines: Vec<PublishLine> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(report) => PublishLine {
                code: outcome.code,
                report: Some(report),
                error: None,
            },
            Err(error) => {
                failed += 1;
                PublishLine {
                    code: outcome.code,
                    report: None,
                    error: Some(error.to_string()),
                }
            }
        })
        .collect();

    output(&lines, flags.format)?;
    if failed > 0 {
        anyhow::bail!("{failed} of {} frameworks failed to publish", lines.len());
    }
    Ok(())
}
