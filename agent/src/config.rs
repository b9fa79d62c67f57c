//! Configuration for the logging agent
//!
//! Values come from an optional TOML file, then `PACKETLOG_*` environment
//! variables, then the defaults below. Edits that are written back to disk
//! read the file alone so that environment overrides never get persisted.
//!
//! ```toml
//! log_dir = "packet_logs"
//! file_prefix = "packets"
//! exclusions = ["0x002", "0x028:0x1844"]
//! ```

use anyhow::{Context, Result};
use packetlog_shared::types::filter::ExclusionSet;
use packetlog_shared::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_log_dir() -> PathBuf {
    PathBuf::from("packet_logs")
}

fn default_file_prefix() -> String {
    "packets".to_string()
}

fn default_feed_capacity() -> usize {
    1024
}

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Directory session logs are written to (created on first start)
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// File name prefix for session logs
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Exclusion identifiers, e.g. `0x00A` or `0x028:0x1844`
    #[serde(default)]
    pub exclusions: Vec<String>,

    /// Bound of the channel between the message feed and the session
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_prefix: default_file_prefix(),
            exclusions: Vec::new(),
            feed_capacity: default_feed_capacity(),
        }
    }
}

impl AgentConfig {
    /// Load from an optional file plus `PACKETLOG_*` environment overrides.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix("PACKETLOG")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclusions"),
        );

        let config: Self = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Load from the file alone, ignoring the environment.
    ///
    /// Use this when the result is going to be saved back to `path`.
    pub fn load_file(path: &Path) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .build()
            .with_context(|| format!("Failed to read configuration: {}", path.display()))?
            .try_deserialize()
            .context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Add (`exclude`) or remove `rules` in the exclusion list stored at `path`.
    ///
    /// Returns how many rules changed and the resulting set. The file is only
    /// rewritten when something changed.
    pub fn edit_exclusions(
        path: &Path,
        rules: &ExclusionSet,
        exclude: bool,
    ) -> Result<(usize, ExclusionSet)> {
        let mut config = Self::load_file(path)?;
        let mut exclusions = config
            .exclusion_set()
            .context("Existing exclusion list is invalid")?;

        let mut changed = 0;
        for rule in rules {
            let did_change = if exclude {
                exclusions.insert(*rule)
            } else {
                exclusions.remove(rule)
            };
            if did_change {
                changed += 1;
            }
        }

        if changed > 0 {
            config.set_exclusions(&exclusions);
            config.save(path)?;
        }
        Ok((changed, exclusions))
    }

    /// Write the configuration back as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let text = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write configuration: {}", path.display()))?;
        Ok(())
    }

    /// Parse the configured identifiers into an exclusion set
    pub fn exclusion_set(&self) -> Result<ExclusionSet, ConfigError> {
        ExclusionSet::parse_all(&self.exclusions)
    }

    /// Replace the identifier list with the canonical form of `set`
    pub fn set_exclusions(&mut self, set: &ExclusionSet) {
        self.exclusions = set.to_identifiers();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.trim().is_empty() {
            anyhow::bail!("File prefix must not be empty");
        }

        if self
            .file_prefix
            .contains(|c: char| std::path::is_separator(c))
        {
            anyhow::bail!("File prefix must not contain path separators");
        }

        if self.feed_capacity == 0 {
            anyhow::bail!("Feed capacity must be greater than 0");
        }

        self.exclusion_set().context("Invalid exclusion list")?;

        Ok(())
    }
}
