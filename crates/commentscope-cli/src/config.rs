//! CLI configuration loading

use commentscope_analyzer::AnalysisConfig;
use std::path::PathBuf;
use tracing::debug;

/// Per-user config used when the given path does not exist
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("commentscope").join("commentscope.yaml"))
}

/// Load configuration from file and apply CLI overrides
pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<AnalysisConfig> {
    let found = std::iter::once(PathBuf::from(config_path))
        .chain(user_config_path())
        .find(|p| p.exists());

    // Try to load from file, or use defaults
    let mut config = match found {
        Some(path) => {
            debug!(path = %path.display(), "Reading configuration");
            let content = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)?
        }
        None => AnalysisConfig::default(),
    };

    // Apply CLI overrides
    if let Some(dataset) = &cli.dataset {
        config.dataset = dataset.clone();
    }

    if let Some(rules) = &cli.rules {
        config.rules = Some(rules.clone());
    }

    if cli.no_model {
        config.detectors.learned.enabled = false;
    }

    Ok(config)
}
