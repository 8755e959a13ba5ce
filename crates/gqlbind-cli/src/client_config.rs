use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Settings read from a `--config` JSON file. Command-line flags take
/// precedence over anything set here.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ClientConfig {
    pub endpoint: Option<String>,
    pub headers: IndexMap<String, String>,
    pub schema_files: Vec<PathBuf>,
    pub subscription_endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}
impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {path:?}"))?;

        // Schema paths are relative to the config file, not the working
        // directory.
        if let Some(config_dir) = path.parent() {
            for schema_file in config.schema_files.iter_mut() {
                if schema_file.is_relative() {
                    *schema_file = config_dir.join(&schema_file);
                }
            }
        }
        log::debug!("Loaded client config from {path:?}.");
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
