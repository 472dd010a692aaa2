//! Runner configuration loading.
//!
//! The file is YAML with a single `runner` map. Unknown keys are rejected and
//! a runner without `name` takes its map key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use diffsuggest_types::RunnerConfig;

/// Config file names tried, in order, when `--config` is not given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = [".reviewdog.yml", "reviewdog.yml"];

/// Parse runner config text and apply default names.
pub fn parse_runner_config(text: &str) -> Result<RunnerConfig> {
    let config: RunnerConfig = serde_yaml::from_str(text).context("parse runner config")?;
    Ok(config.with_default_names())
}

/// Read and parse the runner config at `path`.
pub fn load_runner_config(path: &Path) -> Result<RunnerConfig> {
    debug!("Loading runner config from '{}'", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let config =
        parse_runner_config(&text).with_context(|| format!("load config '{}'", path.display()))?;

    debug!(
        "Loaded {} runner(s) from '{}'",
        config.runner.len(),
        path.display()
    );
    Ok(config)
}

/// First default config file present in `dir`.
pub fn find_default_config(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}
