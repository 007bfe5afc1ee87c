//! Link failure and partition detection.
//!
//! Independent of the Day-1 run: it mutates the graph's `up` flag directly
//! and must not be called while a simulation is active on the same graph.

use serde::Serialize;

use crate::topology::TopologyGraph;

/// What happened when a link was failed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkFailureOutcome {
    pub lines: Vec<String>,
    pub partitioned: bool,
    /// Connected components after the failure; empty when nothing was changed
    pub components: Vec<Vec<String>>,
}

impl LinkFailureOutcome {
    fn error(line: String) -> Self {
        log::error!("{}", line);
        Self {
            lines: vec![line],
            ..Self::default()
        }
    }

    /// True when the link was actually brought down
    pub fn applied(&self) -> bool {
        !self.components.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Split `NODE1-NODE2` into its two hostnames
pub fn parse_link_key(key: &str) -> Option<(&str, &str)> {
    let mut parts = key.trim().split('-');
    let a = parts.next()?.trim();
    let b = parts.next()?.trim();
    if parts.next().is_some() || a.is_empty() || b.is_empty() {
        return None;
    }
    Some((a, b))
}

/// Mark the link `key` down and report any resulting partition
pub fn fail_link(graph: &mut TopologyGraph, key: &str) -> LinkFailureOutcome {
    let Some((a, b)) = parse_link_key(key) else {
        return LinkFailureOutcome::error(format!("Invalid link format '{}'. Use NODE1-NODE2", key.trim()));
    };

    if !graph.set_link_down(a, b) {
        return LinkFailureOutcome::error(format!("No such edge: {}-{}", a, b));
    }

    let mut lines = vec![format!("Link {}-{} brought down", a, b)];
    log::info!("{}", lines[0]);

    let components = graph.connected_components();
    let partitioned = components.len() > 1;
    if partitioned {
        lines.push("Network partition occurred:".to_string());
        for component in &components {
            lines.push(format!("Component: {{{}}}", component.join(", ")));
        }
        log::warn!("Failing {}-{} partitioned the network into {} components", a, b, components.len());
    }

    LinkFailureOutcome {
        lines,
        partitioned,
        components,
    }
}
