//! Core data types for capacity and resiliency analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Demand added per ordered device pair, in Mbps
pub const DEFAULT_DEMAND_PER_PAIR_MBPS: f64 = 10.0;

/// Utilization above which a link counts as a bottleneck
pub const DEFAULT_BOTTLENECK_THRESHOLD: f64 = 0.8;

/// Tunables for [`super::analyze_network`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub demand_per_pair_mbps: f64,
    pub bottleneck_threshold: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            demand_per_pair_mbps: DEFAULT_DEMAND_PER_PAIR_MBPS,
            bottleneck_threshold: DEFAULT_BOTTLENECK_THRESHOLD,
        }
    }
}

/// Load on one link under the all-pairs demand model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkUtilization {
    /// Link key `A-B`
    pub link: String,
    pub capacity_mbps: f64,
    pub load_mbps: f64,
    /// `load / capacity`, or 0 when capacity is not positive
    pub utilization: f64,
}

/// Per-link loads plus a one-line summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandwidthReport {
    pub summary: String,
    /// In graph link order
    pub links: Vec<LinkUtilization>,
}

impl BandwidthReport {
    /// Look up a link by its `A-B` key
    pub fn get(&self, link: &str) -> Option<&LinkUtilization> {
        self.links.iter().find(|l| l.link == link)
    }

    /// Mean utilization, 0 with no links
    pub fn average_utilization(&self) -> f64 {
        if self.links.is_empty() {
            0.0
        } else {
            self.links.iter().map(|l| l.utilization).sum::<f64>() / self.links.len() as f64
        }
    }
}

/// Full capacity/resiliency analysis of a topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub bandwidth: BandwidthReport,
    /// Keys of links above the bottleneck threshold
    pub bottlenecks: Vec<String>,
    /// 0-100, rounded to two decimals
    pub resiliency_score: f64,
    pub summary: String,
}

/// Severity of an optimization hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// Capacity-driven optimization hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// Link is close to saturation
    UpgradeLink { link: String, utilization: f64 },
    /// Link is busy enough to consider rebalancing traffic
    TrafficEngineering { link: String, utilization: f64 },
    /// Many single-homed devices
    AccessAggregation { leaf_count: usize },
}

impl Suggestion {
    pub fn severity(&self) -> Severity {
        match self {
            Suggestion::UpgradeLink { .. } => Severity::Critical,
            Suggestion::TrafficEngineering { .. } => Severity::Warning,
            Suggestion::AccessAggregation { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::UpgradeLink { link, utilization } => write!(
                f,
                "[CRITICAL] Upgrade link {} (util {:.2}) or add backup path",
                link, utilization
            ),
            Suggestion::TrafficEngineering { link, utilization } => write!(
                f,
                "[WARN] Consider traffic engineering for {} (util {:.2})",
                link, utilization
            ),
            Suggestion::AccessAggregation { leaf_count } => write!(
                f,
                "Many leaf nodes ({}); consider access-layer aggregation",
                leaf_count
            ),
        }
    }
}
