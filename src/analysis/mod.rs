//! Capacity and resiliency analysis.
//!
//! This module estimates per-link load under an all-pairs demand model,
//! derives bottlenecks and a resiliency score, and renders reports.

pub mod bandwidth;
pub mod optimizer;
pub mod report;
pub mod resilience;
pub mod types;

pub use bandwidth::{check_bandwidth, link_loads};
pub use optimizer::suggest_optimizations;
pub use report::{generate_json_report, generate_text_report, render_text_report, TopologyReport};
pub use resilience::{analyze_network, find_bottlenecks, resiliency_score};
pub use types::*;
