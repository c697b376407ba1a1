//! Runtime settings - CLI flags and environment over an optional YAML file

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE, DEFAULT_AVATAR_URL, DEFAULT_LOG_FILE,
    DEFAULT_TIMEOUT_SECS,
};

/// Command line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "splitmon", version, about = "Split bills with friends from your terminal")]
pub struct CliArgs {
    /// Base address of the friends backend
    #[arg(long, env = "SPLITMON_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SPLITMON_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Log file path
    #[arg(long, env = "SPLITMON_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Config file (default: ~/.splitmon/config.yaml)
    #[arg(long, env = "SPLITMON_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Values accepted in the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub default_avatar: Option<String>,
}

impl FileConfig {
    /// Read a config file. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<FileConfig> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(FileConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Resolved settings
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub default_avatar: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: String::from(DEFAULT_API_BASE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            default_avatar: String::from(DEFAULT_AVATAR_URL),
        }
    }
}

impl Settings {
    /// Resolve settings from the command line, reading the config file it
    /// points to (or the default one)
    pub fn from_cli(cli: &CliArgs) -> Result<Settings> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        let file = FileConfig::load(&path)?;
        Settings::resolve(cli, file)
    }

    /// Layer CLI values over file values over defaults, then validate
    pub fn resolve(cli: &CliArgs, file: FileConfig) -> Result<Settings> {
        let defaults = Settings::default();

        let api_url = cli
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or(defaults.api_url);
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        ensure!(!api_url.is_empty(), "api url must not be empty");
        ensure!(
            api_url.starts_with("http://") || api_url.starts_with("https://"),
            "api url must start with http:// or https:// (got '{}')",
            api_url
        );

        let timeout_secs = cli
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        ensure!(timeout_secs > 0, "timeout must be greater than zero");

        Ok(Settings {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            log_file: cli
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or(defaults.log_file),
            default_avatar: file.default_avatar.unwrap_or(defaults.default_avatar),
        })
    }
}

/// `~/.splitmon/config.yaml`, falling back to the working directory
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}
