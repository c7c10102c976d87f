//! Run configuration
//!
//! A [`Config`] is built once, before any worker starts, and only read
//! afterwards. Values come from, lowest precedence first: built-in defaults,
//! the site configuration file, the `HOOR_MAXPROCS` environment variable and
//! command-line flags.

use crate::core::DEFAULT_DATE_FORMAT;
use crate::error::{HoorError, Result};
use crate::io::absolutize;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the parallelism factor
pub const PROCS_ENV: &str = "HOOR_MAXPROCS";

/// Site configuration files looked up in the source directory, in order
pub const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

pub const DEFAULT_CONTENT_DIR: &str = "content";

/// Immutable settings shared by every worker of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute path of the content root
    pub content_dir: PathBuf,
    /// Template for the rendered Shamsi date
    pub date_format: String,
    /// Parallelism factor, at least 1
    pub parallelism: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            parallelism: 1,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// The parts of a site configuration file hoor reads
#[derive(Debug, Default, Deserialize)]
struct SiteConfig {
    #[serde(rename = "contentDir", alias = "contentdir", alias = "content_dir")]
    content_dir: Option<String>,
    #[serde(default)]
    params: SiteParams,
}

#[derive(Debug, Default, Deserialize)]
struct SiteParams {
    #[serde(rename = "shamsiDateFormat", alias = "shamsidateformat")]
    shamsi_date_format: Option<String>,
}

/// Parse the parallelism factor; anything but a positive integer means 1.
pub fn parallelism_from(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// Builder for [`Config`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    source: Option<PathBuf>,
    config_file: Option<PathBuf>,
    content_dir: Option<PathBuf>,
    date_format: Option<String>,
    parallelism: Option<usize>,
    procs_env: Option<String>,
}

impl ConfigBuilder {
    /// Site root; relative content directories are resolved against it
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Explicit site configuration file
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn content_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.content_dir = dir;
        self
    }

    pub fn date_format(mut self, format: Option<String>) -> Self {
        self.date_format = format;
        self
    }

    pub fn parallelism(mut self, parallelism: Option<usize>) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Raw value of [`PROCS_ENV`]
    pub fn procs_env(mut self, value: Option<String>) -> Self {
        self.procs_env = value;
        self
    }

    pub fn build(self) -> Result<Config> {
        let source = self.source.unwrap_or_else(|| PathBuf::from("."));

        let site = match &self.config_file {
            Some(path) => load_site_config(path)?,
            None => discover_site_config(&source)?,
        };

        let content_dir = self
            .content_dir
            .or_else(|| site.content_dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR));
        let content_dir = absolutize(&source.join(content_dir))?;

        let date_format = self
            .date_format
            .or(site.params.shamsi_date_format)
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());

        let parallelism = self
            .parallelism
            .filter(|&n| n >= 1)
            .unwrap_or_else(|| parallelism_from(self.procs_env.as_deref()));

        let config = Config {
            content_dir,
            date_format,
            parallelism,
        };
        debug!("Using configuration: {:?}", config);
        Ok(config)
    }
}

fn discover_site_config(source: &Path) -> Result<SiteConfig> {
    for name in CONFIG_FILE_NAMES {
        let candidate = source.join(name);
        if candidate.is_file() {
            return load_site_config(&candidate);
        }
    }
    warn!(
        "No site configuration found in {}, using defaults",
        source.display()
    );
    Ok(SiteConfig::default())
}

fn load_site_config(path: &Path) -> Result<SiteConfig> {
    let text = fs::read_to_string(path).map_err(|e| HoorError::config(path, e.to_string()))?;
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let parsed = match extension.as_str() {
        "toml" | "tml" => toml::from_str(&text).map_err(|e| e.to_string()),
        "yaml" | "yml" => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
        "json" | "js" => serde_json::from_str(&text).map_err(|e| e.to_string()),
        other => Err(format!("unsupported configuration format {other:?}")),
    };

    // An empty YAML document deserializes to nothing at all.
    match parsed {
        Ok(site) => Ok(site),
        Err(_) if extension.starts_with('y') && text.trim().is_empty() => Ok(SiteConfig::default()),
        Err(reason) => Err(HoorError::config(path, reason)),
    }
}
