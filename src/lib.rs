//! # Netsim - Topology modelling and Day-1 simulation for network configs
//!
//! This library turns router/switch/host configuration dumps into a
//! validated topology model, scores it for capacity risk and runs a small
//! concurrent simulation of device bring-up and link failure.
//!
//! ## Overview
//!
//! Netsim gives network engineers a quick sanity model of a lab or a
//! documented network without a full emulation stack. It is not a packet
//! accurate emulator: the simulation models bring-up handshakes and
//! connectivity after a link goes down, nothing more.
//!
//! ## Key Features
//!
//! - **Config Parsing**: Cisco-like `.dump`/`.cfg`/`.txt` files into device records
//! - **Topology Builder**: explicit link files plus description and subnet inference
//! - **Validation**: duplicate IPs per VLAN, MTU mismatches, bad gateways, loops
//! - **Capacity Analysis**: all-pairs demand model, bottlenecks, resiliency score
//! - **Simulation**: one worker per device plus a broker, HELLO/ARP exchange
//! - **Link Failure**: take a link down and detect partitions
//!
//! ## Architecture
//!
//! - `device`: Device records and the config dump parser
//! - `topology`: Graph, link file parser and topology builder
//! - `validation`: Structural checks over the graph
//! - `analysis`: Bandwidth analysis, resiliency score, suggestions, reports
//! - `simulation`: Day-1 bring-up and link failure
//! - `config`: Run configuration structures
//! - `config_loader`: YAML loading and CLI overrides
//! - `orchestrator`: End-to-end pipeline helpers
//! - `utils`: IPv4 subnet and duration helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use netsim::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("netsim.yaml"))?;
//! let graph = orchestrator::build_from_config(&config);
//! let report = orchestrator::analyze_topology(&graph, &config);
//! println!("{}", report.analysis.summary);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   log_level: info
//! inputs:
//!   config_dir: ./configs
//!   links_file: ./configs/links.txt
//! analysis:
//!   demand_per_pair_mbps: 10.0
//!   bottleneck_threshold: 0.8
//! simulation:
//!   duration: 5s
//!   poll_interval: 100ms
//!   arp_requests: false
//! ```
//!
//! ## Error Handling
//!
//! Bad input lines, unknown devices and malformed addresses are logged and
//! skipped. Only I/O failures and thread spawn failures surface as errors,
//! through `color_eyre` in the pipeline and typed `thiserror` enums in the
//! library.

pub mod analysis;
pub mod config;
pub mod config_loader;
pub mod device;
pub mod orchestrator;
pub mod simulation;
pub mod topology;
pub mod utils;
pub mod validation;
