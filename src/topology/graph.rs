//! Topology graph.
//!
//! An undirected simple graph keyed by hostname. Nodes carry the
//! [`DeviceRecord`] they were built from and edges carry a [`LinkRecord`].
//! Traversals (neighbors, degree, shortest path, components) only follow
//! links that are up; enumeration lists every link.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::DeviceRecord;

/// How a link was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    /// Listed in the explicit link file
    Explicit,
    /// An interface description names the neighbor
    DescHint,
    /// Two interfaces share a subnet
    Subnet,
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LinkSource::Explicit => "explicit",
            LinkSource::DescHint => "desc_hint",
            LinkSource::Subnet => "subnet",
        };
        f.write_str(label)
    }
}

/// Attributes of one link between two devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    devices: (String, String),
    #[serde(skip)]
    endpoints: (usize, usize),
    ifaces: Vec<String>,
    mtu: u32,
    bandwidth_mbps: u32,
    up: bool,
    source: LinkSource,
}

impl LinkRecord {
    /// The two devices, in the order the link was added
    pub fn devices(&self) -> (&str, &str) {
        (&self.devices.0, &self.devices.1)
    }

    /// `device:interface` endpoints; one entry for single-sided links
    pub fn ifaces(&self) -> &[String] {
        &self.ifaces
    }

    pub fn mtu(&self) -> u32 {
        self.mtu
    }

    pub fn bandwidth_mbps(&self) -> u32 {
        self.bandwidth_mbps
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    pub fn source(&self) -> LinkSource {
        self.source
    }

    /// Display key `A-B`
    pub fn key(&self) -> String {
        format!("{}-{}", self.devices.0, self.devices.1)
    }

    /// True when this link joins `a` and `b` in either order
    pub fn connects(&self, a: &str, b: &str) -> bool {
        let (x, y) = self.devices();
        (x == a && y == b) || (x == b && y == a)
    }

    pub(crate) fn endpoints(&self) -> (usize, usize) {
        self.endpoints
    }
}

/// Attributes for a new link, before it is placed in a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub ifaces: Vec<String>,
    pub mtu: u32,
    pub bandwidth_mbps: u32,
    pub source: LinkSource,
}

/// Reasons a link cannot be added
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),
    #[error("Link {0}-{1} already exists")]
    DuplicateLink(String, String),
    #[error("Self-link on '{0}' is not allowed")]
    SelfLink(String),
}

/// Undirected device/link graph
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    nodes: Vec<DeviceRecord>,
    index: HashMap<String, usize>,
    links: Vec<LinkRecord>,
    /// Per node: (neighbor index, link index) in link insertion order
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device node.
    ///
    /// A device whose hostname already exists replaces the stored record and
    /// keeps its position and links; returns `false` in that case.
    pub fn add_device(&mut self, device: DeviceRecord) -> bool {
        if let Some(&idx) = self.index.get(&device.hostname) {
            self.nodes[idx] = device;
            return false;
        }
        self.index.insert(device.hostname.clone(), self.nodes.len());
        self.nodes.push(device);
        self.adjacency.push(Vec::new());
        true
    }

    /// Add a link between two known devices.
    ///
    /// At most one link exists per unordered device pair; links start up.
    pub fn add_link(&mut self, a: &str, b: &str, spec: LinkSpec) -> Result<(), GraphError> {
        let ia = self.index_of(a).ok_or_else(|| GraphError::UnknownDevice(a.to_string()))?;
        let ib = self.index_of(b).ok_or_else(|| GraphError::UnknownDevice(b.to_string()))?;
        if ia == ib {
            return Err(GraphError::SelfLink(a.to_string()));
        }
        if self.has_link(a, b) {
            return Err(GraphError::DuplicateLink(a.to_string(), b.to_string()));
        }

        let link_idx = self.links.len();
        self.links.push(LinkRecord {
            devices: (a.to_string(), b.to_string()),
            endpoints: (ia, ib),
            ifaces: spec.ifaces,
            mtu: spec.mtu,
            bandwidth_mbps: spec.bandwidth_mbps,
            up: true,
            source: spec.source,
        });
        self.adjacency[ia].push((ib, link_idx));
        self.adjacency[ib].push((ia, link_idx));
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links, up or down
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Devices in insertion order
    pub fn devices(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.nodes.iter()
    }

    /// Hostnames in insertion order
    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|d| d.hostname.as_str())
    }

    pub fn device(&self, hostname: &str) -> Option<&DeviceRecord> {
        self.index_of(hostname).map(|idx| &self.nodes[idx])
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.index.contains_key(hostname)
    }

    /// Every link with its attributes, in insertion order
    pub fn links(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter()
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&LinkRecord> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        self.adjacency[ia]
            .iter()
            .find(|(n, _)| *n == ib)
            .map(|(_, l)| &self.links[*l])
    }

    pub fn has_link(&self, a: &str, b: &str) -> bool {
        self.link(a, b).is_some()
    }

    /// Neighbors over links that are up, in link insertion order
    pub fn neighbors(&self, hostname: &str) -> Vec<&str> {
        match self.index_of(hostname) {
            Some(idx) => self
                .active_adjacency(idx)
                .map(|(n, _)| self.nodes[n].hostname.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of links that are up on this device
    pub fn degree(&self, hostname: &str) -> usize {
        self.index_of(hostname)
            .map(|idx| self.active_adjacency(idx).count())
            .unwrap_or(0)
    }

    /// Hop-count shortest path from `from` to `to`, both ends included.
    ///
    /// Ties resolve to the first path found by a breadth-first search that
    /// expands neighbors in link insertion order.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let src = self.index_of(from)?;
        let dst = self.index_of(to)?;
        let parents = self.bfs_tree(src);
        let hops = self.path_links(&parents, src, dst)?;

        let mut path = vec![self.nodes[src].hostname.clone()];
        let mut current = src;
        for link_idx in hops {
            let (a, b) = self.links[link_idx].endpoints;
            current = if a == current { b } else { a };
            path.push(self.nodes[current].hostname.clone());
        }
        Some(path)
    }

    /// Connected components over links that are up.
    ///
    /// Components are ordered by their first member; members follow node
    /// insertion order.
    pub fn connected_components(&self) -> Vec<Vec<String>> {
        let mut component_of: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut count = 0;

        for start in 0..self.nodes.len() {
            if component_of[start].is_some() {
                continue;
            }
            let mut queue = vec![start];
            component_of[start] = Some(count);
            while let Some(node) = queue.pop() {
                for (neighbor, _) in self.active_adjacency(node) {
                    if component_of[neighbor].is_none() {
                        component_of[neighbor] = Some(count);
                        queue.push(neighbor);
                    }
                }
            }
            count += 1;
        }

        let mut components = vec![Vec::new(); count];
        for (idx, comp) in component_of.into_iter().enumerate() {
            if let Some(comp) = comp {
                components[comp].push(self.nodes[idx].hostname.clone());
            }
        }
        components
    }

    /// Mark the link between `a` and `b` down. Returns false if no such link.
    ///
    /// This is the only mutation allowed after construction. It must not run
    /// while a simulation over the same graph is active.
    pub(crate) fn set_link_down(&mut self, a: &str, b: &str) -> bool {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        let found = self.adjacency[ia].iter().find(|(n, _)| *n == ib).map(|(_, l)| *l);
        match found {
            Some(link_idx) => {
                self.links[link_idx].up = false;
                true
            }
            None => false,
        }
    }

    pub(crate) fn index_of(&self, hostname: &str) -> Option<usize> {
        self.index.get(hostname).copied()
    }

    pub(crate) fn hostname_at(&self, idx: usize) -> &str {
        &self.nodes[idx].hostname
    }

    /// Overwrite the attributes of the existing link between `a` and `b`.
    ///
    /// The stored orientation and `up` flag are kept. Returns false if no
    /// such link exists.
    pub(crate) fn replace_link_attributes(&mut self, a: &str, b: &str, spec: LinkSpec) -> bool {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        let Some(link_idx) = self.adjacency[ia].iter().find(|(n, _)| *n == ib).map(|(_, l)| *l) else {
            return false;
        };
        let link = &mut self.links[link_idx];
        link.ifaces = spec.ifaces;
        link.mtu = spec.mtu;
        link.bandwidth_mbps = spec.bandwidth_mbps;
        link.source = spec.source;
        true
    }

    /// (neighbor, link) pairs over links that are up
    pub(crate) fn active_adjacency(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency[idx]
            .iter()
            .copied()
            .filter(move |(_, l)| self.links[*l].up)
    }

    /// BFS from `src`: for every reached node, the (parent, link) it was
    /// discovered through. `src` itself maps to `None`.
    pub(crate) fn bfs_tree(&self, src: usize) -> Vec<Option<(usize, usize)>> {
        let mut parents: Vec<Option<(usize, usize)>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([src]);
        visited[src] = true;

        while let Some(node) = queue.pop_front() {
            for (neighbor, link) in self.active_adjacency(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    parents[neighbor] = Some((node, link));
                    queue.push_back(neighbor);
                }
            }
        }
        parents
    }

    /// Links on the BFS-tree path from `src` to `dst`, in travel order.
    /// `None` when `dst` was not reached.
    pub(crate) fn path_links(
        &self,
        parents: &[Option<(usize, usize)>],
        src: usize,
        dst: usize,
    ) -> Option<Vec<usize>> {
        let mut hops = Vec::new();
        let mut current = dst;
        while current != src {
            let (parent, link) = parents[current]?;
            hops.push(link);
            current = parent;
        }
        hops.reverse();
        Some(hops)
    }
}
