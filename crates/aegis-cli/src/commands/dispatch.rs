use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Publish(args) => commands::publish::handle(&args, ctx, flags).await,
        Commands::Retire(args) => commands::retire::handle(&args.code, ctx, flags).await,
        Commands::Snapshots => commands::snapshots::handle(ctx, flags).await,
        Commands::Tree(args) => commands::tree::handle(&args.code, ctx, flags).await,
        Commands::Flatten(args) => commands::flatten::handle(&args.code, ctx, flags).await,
        Commands::Assessment { action } => commands::assessment::handle(&action, ctx, flags).await,
    }
}
