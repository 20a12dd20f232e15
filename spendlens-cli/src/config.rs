use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spendlens_client::DEFAULT_BASE_URL;
use spendlens_core::DashboardSettings;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::ensure_spendlens_home;

/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "SPENDLENS_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub ml: MlSection,
    pub savings: SavingsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlSection {
    /// Prefer backend predictions over the local aggregate.
    pub enabled: bool,
    pub refine_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsSection {
    pub max_items: usize,
    pub merchant_limit: usize,
    pub top_categories: usize,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for MlSection {
    fn default() -> Self {
        let d = DashboardSettings::default();
        Self {
            enabled: d.use_ml,
            refine_threshold: d.refine_threshold,
        }
    }
}

impl Default for SavingsSection {
    fn default() -> Self {
        let d = DashboardSettings::default();
        Self {
            max_items: d.max_items,
            merchant_limit: d.merchant_limit,
            top_categories: d.top_categories,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            use_ml: self.ml.enabled,
            refine_threshold: self.ml.refine_threshold,
            top_categories: self.savings.top_categories,
            merchant_limit: self.savings.merchant_limit,
            max_items: self.savings.max_items,
            ..DashboardSettings::default()
        }
    }

    fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        self
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendlens_home()?.join("config.toml"))
}

/// File config (or defaults) with the environment override applied.
pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    let cfg = if p.exists() {
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        toml::from_str(&s).context("parse config.toml")?
    } else {
        Config::default()
    };
    Ok(cfg.with_api_url(std::env::var(API_URL_ENV).ok()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}
