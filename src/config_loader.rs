use crate::config::NetSimConfig;
use crate::utils::parse_duration;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<NetSimConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .with_context(|| format!("Failed to open configuration file {}", config_path.display()))?;

    let config: NetSimConfig = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse configuration file {}", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load `config_path` if given, otherwise start from defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<NetSimConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(NetSimConfig::default())
        }
    }
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_dir: Option<PathBuf>,
    pub links_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub demand_per_pair_mbps: Option<f64>,
    /// Raw duration string, e.g. "30s" or "500ms"
    pub duration: Option<String>,
    pub arp_requests: bool,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut NetSimConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(dir) = &overrides.config_dir {
        config.inputs.config_dir = dir.clone();
    }
    if let Some(links) = &overrides.links_file {
        config.inputs.links_file = Some(links.clone());
    }
    if let Some(level) = &overrides.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(demand) = overrides.demand_per_pair_mbps {
        config.analysis.demand_per_pair_mbps = demand;
    }
    if let Some(raw) = &overrides.duration {
        config.simulation.duration = parse_cli_duration(raw)?;
    }
    if overrides.arp_requests {
        config.simulation.arp_requests = true;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

fn parse_cli_duration(raw: &str) -> Result<Duration> {
    parse_duration(raw).map_err(|e| eyre!("Invalid duration '{}': {}", raw, e))
}

/// Link file to use: the configured one, else `<config_dir>/links.txt` if present
pub fn resolve_links_file(config: &NetSimConfig) -> Option<PathBuf> {
    if let Some(path) = &config.inputs.links_file {
        return Some(path.clone());
    }
    let fallback = config.inputs.config_dir.join("links.txt");
    fallback.is_file().then_some(fallback)
}
