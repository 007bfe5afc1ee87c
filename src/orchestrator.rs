//! Pipeline orchestrator.
//!
//! This module coordinates a full run, from config dumps on disk through
//! topology construction to validation, analysis and simulation.

use crate::analysis::{analyze_network, suggest_optimizations, TopologyReport};
use crate::config::NetSimConfig;
use crate::config_loader::resolve_links_file;
use crate::device::{parse_all_configs, DeviceRecord};
use crate::simulation::{fail_link, run_simulation, LinkFailureOutcome, SimulationRun};
use crate::topology::{build_topology, parse_links_file, ExplicitLink, TopologyGraph};
use crate::validation::validate_topology;
use color_eyre::eyre::{Context, Result};
use log::{info, warn};

/// Message shown to the user when parsing produced no devices
pub const NO_TOPOLOGY: &str = "no topology built";

/// Parsed inputs for one run
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub devices: Vec<DeviceRecord>,
    pub links: Vec<ExplicitLink>,
}

/// Read device dumps and the explicit link list named by `config`.
///
/// A missing config directory or unreadable link file is logged and
/// treated as empty input.
pub fn load_inputs(config: &NetSimConfig) -> PipelineInputs {
    let devices = parse_all_configs(&config.inputs.config_dir);

    let links = match resolve_links_file(config) {
        Some(path) => match parse_links_file(&path) {
            Ok(links) => links,
            Err(e) => {
                warn!("Ignoring link file: {:#}", e);
                Vec::new()
            }
        },
        None => {
            info!("No link file, relying on inference");
            Vec::new()
        }
    };

    PipelineInputs { devices, links }
}

/// Build the topology for `config`
pub fn build_from_config(config: &NetSimConfig) -> TopologyGraph {
    let inputs = load_inputs(config);
    let graph = build_topology(&inputs.devices, &inputs.links);
    if graph.node_count() == 0 {
        warn!("{}", NO_TOPOLOGY);
    }
    graph
}

/// Validate and analyze `graph` into a single report
pub fn analyze_topology(graph: &TopologyGraph, config: &NetSimConfig) -> TopologyReport {
    let issues = validate_topology(graph);
    let analysis = analyze_network(graph, &config.analysis_options());
    let suggestions = suggest_optimizations(graph, &analysis.bandwidth);

    TopologyReport::new(
        &config.inputs.config_dir.display().to_string(),
        analysis,
        issues,
        suggestions,
    )
}

/// Run the Day-1 simulation with the configured options
pub fn simulate(graph: &TopologyGraph, config: &NetSimConfig) -> Result<SimulationRun> {
    let options = config.simulation_options();
    info!("Running Day-1 simulation for {:?}", options.duration);
    run_simulation(graph, &options).wrap_err("Day-1 simulation failed")
}

/// Fail a link on a freshly built graph
pub fn fail_link_in(graph: &mut TopologyGraph, key: &str) -> LinkFailureOutcome {
    let outcome = fail_link(graph, key);
    if outcome.partitioned {
        warn!("Link failure {} partitions the topology", key);
    }
    outcome
}
