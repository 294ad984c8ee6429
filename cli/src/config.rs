//! CLI Configuration
//!
//! Defaults < `~/.helpdesk/config[.<profile>].toml` < `HELPDESK_API_URL` < flags.

use anyhow::{anyhow, bail, Context, Result};
use helpdesk_domain::Locale;
use helpdesk_sdk::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

pub const KEYS: [&str; 4] = ["api_url", "default_format", "locale", "page_size"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub default_format: Option<String>,
    pub locale: Option<String>,
    pub page_size: Option<u32>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    /// Set a key, rejecting values the CLI could not use later.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                helpdesk_sdk::Client::new(value).map_err(|e| anyhow!("invalid api_url: {}", e))?;
                self.api_url = Some(value.to_string());
            }
            "default_format" => {
                parse_format(value)?;
                self.default_format = Some(value.to_lowercase());
            }
            "locale" => {
                let locale: Locale = value.parse()?;
                self.locale = Some(locale.tag().to_string());
            }
            "page_size" => {
                let size: u32 = value.parse().map_err(|_| anyhow!("page_size must be a positive number"))?;
                if size == 0 {
                    bail!("page_size must be a positive number");
                }
                self.page_size = Some(size);
            }
            _ => bail!("Unknown config key: {} (expected one of {})", key, KEYS.join(", ")),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "default_format" => self.default_format.clone(),
            "locale" => self.locale.clone(),
            "page_size" => self.page_size.map(|n| n.to_string()),
            _ => bail!("Unknown config key: {}", key),
        })
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(config_dir()?.join(filename))
    }
}

pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
    Ok(home.join(".helpdesk"))
}

/// Cookie file for `profile`, next to its config file.
pub fn session_path(profile: Option<&str>) -> Result<PathBuf> {
    let filename = match profile {
        Some(p) => format!("session.{}.json", p),
        None => "session.json".to_string(),
    };
    Ok(config_dir()?.join(filename))
}

fn parse_format(raw: &str) -> Result<OutputFormat> {
    use clap::ValueEnum;
    OutputFormat::from_str(raw, true).map_err(|_| anyhow!("unknown format '{}': use table, json or yaml", raw))
}

/// Effective settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub format: OutputFormat,
    pub locale: Locale,
    pub page_size: u32,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        api_url: Option<String>,
        format: Option<OutputFormat>,
        locale: Option<&str>,
    ) -> Result<Self> {
        let format = match (format, config.default_format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(raw)) => parse_format(raw)?,
            (None, None) => OutputFormat::Table,
        };
        let locale = match locale.or(config.locale.as_deref()) {
            Some(raw) => raw.parse()?,
            None => Locale::default(),
        };
        Ok(Self {
            api_url: api_url
                .or_else(|| config.api_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            format,
            locale,
            page_size: config.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}
