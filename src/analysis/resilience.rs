//! Resiliency scoring.
//!
//! The score blends topological redundancy (share of devices with more than
//! one working link) with bandwidth headroom (mean spare capacity per link).

use crate::topology::TopologyGraph;

use super::bandwidth::check_bandwidth;
use super::types::{AnalysisOptions, AnalysisReport, BandwidthReport};

/// Headroom credit used when there are no links to average over
const EMPTY_HEADROOM_SCORE: f64 = 25.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resiliency score in `[0, 100]`, rounded to two decimals
pub fn resiliency_score(graph: &TopologyGraph, bandwidth: &BandwidthReport) -> f64 {
    let node_count = graph.node_count();
    let redundant = graph.hostnames().filter(|h| graph.degree(h) > 1).count();
    let redundancy_score = redundant as f64 / node_count.max(1) as f64 * 50.0;

    let headroom_score = if bandwidth.links.is_empty() {
        EMPTY_HEADROOM_SCORE
    } else {
        let total: f64 = bandwidth
            .links
            .iter()
            .map(|l| (1.0 - l.utilization).max(0.0))
            .sum();
        total / bandwidth.links.len() as f64 * 50.0
    };

    round2(redundancy_score + headroom_score)
}

/// Keys of links whose utilization exceeds `threshold`
pub fn find_bottlenecks(bandwidth: &BandwidthReport, threshold: f64) -> Vec<String> {
    bandwidth
        .links
        .iter()
        .filter(|l| l.utilization > threshold)
        .map(|l| l.link.clone())
        .collect()
}

/// Run the bandwidth model and derive bottlenecks and the resiliency score
pub fn analyze_network(graph: &TopologyGraph, options: &AnalysisOptions) -> AnalysisReport {
    let node_count = graph.node_count();
    let edge_count = graph.link_count();

    let bandwidth = check_bandwidth(graph, options.demand_per_pair_mbps);
    let bottlenecks = find_bottlenecks(&bandwidth, options.bottleneck_threshold);
    let resiliency_score = resiliency_score(graph, &bandwidth);

    let summary = format!(
        "Nodes: {}, Edges: {}, Bottlenecks: {}, Resiliency: {}/100",
        node_count,
        edge_count,
        bottlenecks.len(),
        resiliency_score
    );
    log::info!("Analysis complete: {}", summary);

    AnalysisReport {
        node_count,
        edge_count,
        bandwidth,
        bottlenecks,
        resiliency_score,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceRecord;
    use crate::topology::{LinkSource, LinkSpec};

    fn graph(names: &[&str], links: &[(&str, &str, u32)]) -> TopologyGraph {
        let mut g = TopologyGraph::new();
        for name in names {
            g.add_device(DeviceRecord::new(*name));
        }
        for (a, b, bw) in links {
            let spec = LinkSpec {
                ifaces: Vec::new(),
                mtu: 1500,
                bandwidth_mbps: *bw,
                source: LinkSource::Explicit,
            };
            g.add_link(a, b, spec).unwrap();
        }
        g
    }

    #[test]
    fn test_no_links_scores_half_headroom() {
        let report = analyze_network(&graph(&["A", "B"], &[]), &AnalysisOptions::default());
        assert_eq!(report.resiliency_score, 25.0);

        let empty = analyze_network(&TopologyGraph::new(), &AnalysisOptions::default());
        assert_eq!(empty.resiliency_score, 25.0);
        assert_eq!(empty.summary, "Nodes: 0, Edges: 0, Bottlenecks: 0, Resiliency: 25/100");
    }

    #[test]
    fn test_ring_score() {
        // Each link carries 2 one-hop pairs * 10 = 20 Mbps on 1000: util 0.02
        let g = graph(&["A", "B", "C"], &[("A", "B", 1000), ("B", "C", 1000), ("C", "A", 1000)]);
        let report = analyze_network(&g, &AnalysisOptions::default());
        assert_eq!(report.resiliency_score, 99.0);
        assert!(report.bottlenecks.is_empty());
    }

    #[test]
    fn test_bottleneck_detection() {
        let g = graph(&["A", "B", "C"], &[("A", "B", 45), ("B", "C", 1000)]);
        let report = analyze_network(&g, &AnalysisOptions::default());
        // A-B: 40 Mbps on 45 -> 0.89
        assert_eq!(report.bottlenecks, vec!["A-B".to_string()]);
        // B has degree 2: 16.67; headroom (0.111 + 0.96) / 2 * 50 = 26.78
        assert_eq!(report.resiliency_score, 43.44);
    }

    #[test]
    fn test_saturated_links_give_no_headroom() {
        let g = graph(&["A", "B"], &[("A", "B", 10)]);
        let report = analyze_network(&g, &AnalysisOptions::default());
        // util 2.0 clamps to zero headroom; no node has degree > 1
        assert_eq!(report.resiliency_score, 0.0);
        assert_eq!(report.bandwidth.links[0].utilization, 2.0);
    }
}
