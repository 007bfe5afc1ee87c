use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::{AnalysisOptions, DEFAULT_BOTTLENECK_THRESHOLD, DEFAULT_DEMAND_PER_PAIR_MBPS};
use crate::simulation::engine::{DEFAULT_DURATION, DEFAULT_POLL_INTERVAL};
use crate::simulation::SimulationOptions;

/// Run configuration. Every section is optional.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NetSimConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl NetSimConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.inputs.config_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError::InvalidInputs(
                "config_dir cannot be empty".to_string(),
            ));
        }

        let demand = self.analysis.demand_per_pair_mbps;
        if !(demand.is_finite() && demand > 0.0) {
            return Err(ConfigValidationError::InvalidAnalysis(format!(
                "demand_per_pair_mbps must be positive, got {}",
                demand
            )));
        }

        let threshold = self.analysis.bottleneck_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigValidationError::InvalidAnalysis(format!(
                "bottleneck_threshold must be positive, got {}",
                threshold
            )));
        }

        if self.simulation.poll_interval.is_zero() {
            return Err(ConfigValidationError::InvalidSimulation(
                "poll_interval cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            demand_per_pair_mbps: self.analysis.demand_per_pair_mbps,
            bottleneck_threshold: self.analysis.bottleneck_threshold,
        }
    }

    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            duration: self.simulation.duration,
            poll_interval: self.simulation.poll_interval,
            arp_requests: self.simulation.arp_requests,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Where device dumps and the link file live
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InputsConfig {
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
    /// Falls back to `<config_dir>/links.txt` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links_file: Option<PathBuf>,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            links_file: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_demand")]
    pub demand_per_pair_mbps: f64,
    #[serde(default = "default_threshold")]
    pub bottleneck_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            demand_per_pair_mbps: default_demand(),
            bottleneck_threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_duration", with = "humantime_serde")]
    pub duration: Duration,
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(default)]
    pub arp_requests: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            poll_interval: default_poll_interval(),
            arp_requests: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("./configs")
}

fn default_demand() -> f64 {
    DEFAULT_DEMAND_PER_PAIR_MBPS
}

fn default_threshold() -> f64 {
    DEFAULT_BOTTLENECK_THRESHOLD
}

fn default_duration() -> Duration {
    DEFAULT_DURATION
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid inputs configuration: {0}")]
    InvalidInputs(String),
    #[error("Invalid analysis configuration: {0}")]
    InvalidAnalysis(String),
    #[error("Invalid simulation configuration: {0}")]
    InvalidSimulation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let yaml = r#"
general:
  log_level: debug
inputs:
  config_dir: ./lab
  links_file: ./lab/cabling.txt
analysis:
  demand_per_pair_mbps: 25.0
  bottleneck_threshold: 0.9
simulation:
  duration: 2s
  poll_interval: 50ms
  arp_requests: true
"#;

        let config: NetSimConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.inputs.config_dir, PathBuf::from("./lab"));
        assert_eq!(config.inputs.links_file, Some(PathBuf::from("./lab/cabling.txt")));
        assert_eq!(config.analysis.demand_per_pair_mbps, 25.0);
        assert_eq!(config.simulation.duration, Duration::from_secs(2));
        assert_eq!(config.simulation.poll_interval, Duration::from_millis(50));
        assert!(config.simulation_options().arp_requests);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: NetSimConfig = serde_yaml::from_str("inputs:\n  config_dir: ./x\n").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.analysis, AnalysisConfig::default());
        assert_eq!(config.simulation.duration, Duration::from_secs(5));
        assert_eq!(config.simulation.poll_interval, Duration::from_millis(100));
        assert!(config.inputs.links_file.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = NetSimConfig::default();
        assert!(config.validate().is_ok());

        config.analysis.demand_per_pair_mbps = 0.0;
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidAnalysis(_))));

        config.analysis.demand_per_pair_mbps = 10.0;
        config.analysis.bottleneck_threshold = -1.0;
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidAnalysis(_))));

        config.analysis.bottleneck_threshold = 0.8;
        config.simulation.poll_interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidSimulation(_))));

        config.simulation.poll_interval = Duration::from_millis(100);
        config.inputs.config_dir = PathBuf::new();
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidInputs(_))));
    }
}
