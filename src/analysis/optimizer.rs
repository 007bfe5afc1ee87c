//! Capacity-driven optimization hints.

use crate::topology::TopologyGraph;

use super::types::{BandwidthReport, Suggestion};

/// Utilization above which a link should be upgraded
pub const UPGRADE_THRESHOLD: f64 = 0.95;

/// Utilization above which traffic engineering is worth a look
pub const TRAFFIC_ENGINEERING_THRESHOLD: f64 = 0.75;

/// Leaf count from which access-layer aggregation is suggested
pub const AGGREGATION_LEAF_COUNT: usize = 3;

/// Suggest optimizations, most severe first
pub fn suggest_optimizations(graph: &TopologyGraph, bandwidth: &BandwidthReport) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for link in &bandwidth.links {
        if link.utilization > UPGRADE_THRESHOLD {
            suggestions.push(Suggestion::UpgradeLink {
                link: link.link.clone(),
                utilization: link.utilization,
            });
        } else if link.utilization > TRAFFIC_ENGINEERING_THRESHOLD {
            suggestions.push(Suggestion::TrafficEngineering {
                link: link.link.clone(),
                utilization: link.utilization,
            });
        }
    }

    let leaf_count = graph.hostnames().filter(|h| graph.degree(h) == 1).count();
    if leaf_count >= AGGREGATION_LEAF_COUNT {
        suggestions.push(Suggestion::AccessAggregation { leaf_count });
    }

    // Stable: keeps link order within a severity
    suggestions.sort_by_key(|s| s.severity());
    log::info!("Optimization suggestions produced: {}", suggestions.len());
    suggestions
}
