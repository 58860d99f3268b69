mod create;
mod lifecycle;
mod reports;
mod respond;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AssessmentCommands;
use crate::context::AppContext;

/// Handle `aegis assessment`.
pub async fn handle(
    action: &AssessmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AssessmentCommands::Create {
            framework,
            org,
            name,
        } => create::run(framework, org, name, ctx, flags).await,
        AssessmentCommands::Respond {
            id,
            locator,
            status,
            maturity,
            gaps,
            recommendations,
            notes,
        } => {
            let draft = respond::draft(
                status,
                *maturity,
                gaps.clone(),
                recommendations.clone(),
                notes.clone(),
            );
            respond::run(id, locator, draft, ctx, flags).await
        }
        AssessmentCommands::Complete { id } => lifecycle::complete(id, ctx, flags).await,
        AssessmentCommands::Archive { id } => lifecycle::archive(id, ctx, flags).await,
        AssessmentCommands::Progress { id } => reports::progress(id, ctx, flags).await,
        AssessmentCommands::Maturity { id } => reports::maturity(id, ctx, flags).await,
        AssessmentCommands::Show { id } => reports::show(id, ctx, flags).await,
        AssessmentCommands::List { org } => reports::list(org, ctx, flags).await,
    }
}
