//! Config commands

use crate::config::Config;
use crate::ConfigCommands;
use rules_engine::Dimension;

pub fn handle(action: ConfigCommands, profile: Option<&str>) -> Result<(), String> {
    match action {
        ConfigCommands::Init => {
            let path = Config::default().save(profile)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(profile).unwrap_or_default();
            match key.as_str() {
                "decimals" => {
                    config.decimals = Some(value.parse().map_err(|_| format!("Invalid decimals: {}", value))?)
                }
                "dimensions" => {
                    let dimensions = value
                        .split(',')
                        .map(|d| d.parse::<Dimension>())
                        .collect::<Result<Vec<_>, _>>()?;
                    config.dimensions = Some(dimensions);
                }
                "default_format" => config.default_format = Some(value),
                _ => return Err(format!("Unknown config key: {}", key)),
            }
            config.save(profile)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(profile)?;
            let value = match key.as_str() {
                "decimals" => config.decimals.map(|d| d.to_string()),
                "dimensions" => config.dimensions.map(|d| join(&d)),
                "default_format" => config.default_format,
                _ => return Err(format!("Unknown config key: {}", key)),
            };
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load(profile)?;
            println!("decimals: {}", config.decimals.map(|d| d.to_string()).unwrap_or_else(|| "(not set)".into()));
            println!("dimensions: {}", config.dimensions.as_deref().map(join).unwrap_or_else(|| "(not set)".into()));
            println!("default_format: {}", config.default_format.unwrap_or_else(|| "(not set)".into()));
        }
    }
    Ok(())
}

fn join(dimensions: &[Dimension]) -> String {
    dimensions
        .iter()
        .map(Dimension::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
