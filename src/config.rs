// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::filter::FlagTaxonomy;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub address: IpAddr,
    pub port: u16,
    pub flag_groups_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            flag_groups_path: None,
            log_file: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: String,
    pub server: EnvironmentConfig,
    /// File the settings were read from; `None` when running on defaults.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    /// Load `config.yaml` from the working directory if present, then apply
    /// `RECRUIT_*` environment overrides. Runs before logging is set up, so
    /// callers report [`AppConfig::source`] themselves.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config = Self::load_from_file(Path::new(CONFIG_FILE), &environment)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn get_environment() -> String {
        std::env::var("RECRUIT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                environment: environment.to_string(),
                server: EnvironmentConfig::default(),
                source: None,
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_yaml_str(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Self {
            source: Some(path.to_path_buf()),
            ..config
        })
    }

    pub fn from_yaml_str(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;

        let mut server = match environment {
            "production" => file.production,
            _ => file.local,
        };
        if let Some(path) = server.flag_groups_path.take() {
            server.flag_groups_path = Some(resolve_path(&path)?);
        }

        Ok(Self {
            environment: environment.to_string(),
            server,
            source: None,
        })
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("RECRUIT_PORT") {
            self.server.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("RECRUIT_PORT must be a valid port number"))?;
        }
        if let Some(path) = lookup("RECRUIT_FLAG_GROUPS") {
            self.server.flag_groups_path = Some(resolve_path(Path::new(&path))?);
        }
        Ok(self)
    }

    /// Configured flag groups, or the embedded taxonomy when none is set.
    pub fn flag_taxonomy(&self) -> Result<FlagTaxonomy> {
        match &self.server.flag_groups_path {
            Some(path) => FlagTaxonomy::load(path),
            None => FlagTaxonomy::embedded(),
        }
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
