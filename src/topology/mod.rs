//! Network topology module.
//!
//! This module contains the device/link graph, the explicit link file
//! parser and the builder that assembles a graph from device records.

pub mod builder;
pub mod graph;
pub mod links;

// Re-export key types and functions for easier access
pub use builder::build_topology;
pub use graph::{GraphError, LinkRecord, LinkSource, LinkSpec, TopologyGraph};
pub use links::{parse_links_file, parse_links_text, ExplicitLink, LinkEndpoint};
