use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "gomap.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Json,
    Dot,
}

/// Settings read from `gomap.toml`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    pub include_tests: bool,
    pub most_called_limit: Option<usize>,
    pub jobs: Option<usize>,
    pub format: Option<OutputFormat>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            skip_dirs: vec![".git".to_string(), "vendor".to_string()],
            include_tests: true,
            most_called_limit: None,
            jobs: None,
            format: None,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Use `explicit` if given, else `<root>/gomap.toml` if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate: PathBuf = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
