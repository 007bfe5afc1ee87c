//! Link utilization under an all-pairs demand model.
//!
//! Every ordered pair of distinct devices sends a fixed demand along one
//! hop-count shortest path; each link accumulates the demand of every path
//! crossing it.

use rayon::prelude::*;

use crate::topology::TopologyGraph;

use super::types::{BandwidthReport, LinkUtilization};

/// Per-link load for all flows originating at `src`
fn loads_from(graph: &TopologyGraph, src: usize, demand: f64) -> Vec<f64> {
    let mut load = vec![0.0; graph.link_count()];
    let parents = graph.bfs_tree(src);
    for dst in 0..graph.node_count() {
        if dst == src {
            continue;
        }
        // Unreachable pairs carry no demand
        if let Some(hops) = graph.path_links(&parents, src, dst) {
            for link in hops {
                load[link] += demand;
            }
        }
    }
    load
}

/// Accumulated load per link, indexed like the graph's links
pub fn link_loads(graph: &TopologyGraph, demand_per_pair_mbps: f64) -> Vec<f64> {
    // Sources run in parallel; summing in source order keeps the result
    // identical from run to run.
    let per_source: Vec<Vec<f64>> = (0..graph.node_count())
        .into_par_iter()
        .map(|src| loads_from(graph, src, demand_per_pair_mbps))
        .collect();

    let mut total = vec![0.0; graph.link_count()];
    for loads in per_source {
        for (sum, load) in total.iter_mut().zip(loads) {
            *sum += load;
        }
    }
    total
}

/// Estimate link utilization for the whole topology
pub fn check_bandwidth(graph: &TopologyGraph, demand_per_pair_mbps: f64) -> BandwidthReport {
    let loads = link_loads(graph, demand_per_pair_mbps);

    let links: Vec<LinkUtilization> = graph
        .links()
        .zip(loads)
        .map(|(link, load_mbps)| {
            let capacity_mbps = f64::from(link.bandwidth_mbps());
            let utilization = if capacity_mbps > 0.0 { load_mbps / capacity_mbps } else { 0.0 };
            LinkUtilization {
                link: link.key(),
                capacity_mbps,
                load_mbps,
                utilization,
            }
        })
        .collect();

    let mut report = BandwidthReport {
        summary: String::new(),
        links,
    };
    report.summary = format!(
        "{} links - avg utilization {:.2}",
        report.links.len(),
        report.average_utilization()
    );
    log::info!("Bandwidth check done: {}", report.summary);
    report
}
