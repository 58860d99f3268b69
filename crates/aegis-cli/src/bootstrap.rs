use std::path::PathBuf;

use anyhow::Context;

use aegis_config::AegisConfig;

use crate::cli::GlobalFlags;

/// Load `.env` for the project, then the layered configuration.
///
/// `--project` changes into that directory first so `.aegis/config.toml`
/// and the relative default paths resolve against it.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AegisConfig> {
    if let Some(project) = &flags.project {
        let root = PathBuf::from(project);
        if !root.is_dir() {
            anyhow::bail!("invalid --project '{}': directory does not exist", root.display());
        }
        std::env::set_current_dir(&root)
            .with_context(|| format!("failed to enter project directory {}", root.display()))?;
    }

    load_project_dotenv()?;
    AegisConfig::load().context("failed to load aegis configuration")
}

fn load_project_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
