//! CLI Configuration

use crate::output::OutputFormat;
use clap::ValueEnum;
use rules_engine::{Dimension, EngineSettings, ScopeRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Currency decimal precision
    pub decimals: Option<u32>,
    /// Registered scope dimensions, in evaluation order
    pub dimensions: Option<Vec<Dimension>>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())?;
        Ok(path)
    }

    /// Engine settings, with a command line override for decimals
    pub fn engine_settings(&self, decimals: Option<u32>) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            decimals: decimals.or(self.decimals).unwrap_or(defaults.decimals),
            dimensions: self
                .dimensions
                .clone()
                .map(ScopeRegistry::only)
                .unwrap_or(defaults.dimensions),
            ..defaults
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or(OutputFormat::Json)
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".content-rules").join(filename))
    }
}
