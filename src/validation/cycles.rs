//! Cycle basis over the links that are up.

use std::collections::HashSet;

use crate::topology::TopologyGraph;

/// Compute a cycle basis: one list of hostnames per independent cycle.
///
/// Each component is explored depth-first from its first node; every
/// non-tree link closes exactly one cycle, walked back through the tree to
/// the nearest node already adjacent to the link's far end.
pub fn cycle_basis(graph: &TopologyGraph) -> Vec<Vec<String>> {
    let n = graph.node_count();
    let mut pred: Vec<usize> = (0..n).collect();
    let mut used: Vec<Option<HashSet<usize>>> = vec![None; n];
    let mut cycles: Vec<Vec<usize>> = Vec::new();

    for root in 0..n {
        if used[root].is_some() {
            continue;
        }
        used[root] = Some(HashSet::new());
        let mut stack = vec![root];

        while let Some(z) = stack.pop() {
            let z_used = used[z].clone().unwrap_or_default();
            for (nbr, _) in graph.active_adjacency(z) {
                if used[nbr].is_none() {
                    pred[nbr] = z;
                    stack.push(nbr);
                    used[nbr] = Some(HashSet::from([z]));
                    continue;
                }
                if z_used.contains(&nbr) {
                    continue;
                }
                let nbr_used = used[nbr].get_or_insert_with(HashSet::new);
                let mut cycle = vec![nbr, z];
                let mut p = pred[z];
                while !nbr_used.contains(&p) {
                    cycle.push(p);
                    p = pred[p];
                }
                cycle.push(p);
                cycles.push(cycle);
                nbr_used.insert(z);
            }
        }
    }

    cycles
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|i| graph.hostname_at(i).to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceRecord;
    use crate::topology::{LinkSource, LinkSpec};

    fn graph(names: &[&str], links: &[(&str, &str)]) -> TopologyGraph {
        let mut g = TopologyGraph::new();
        for name in names {
            g.add_device(DeviceRecord::new(*name));
        }
        for (a, b) in links {
            let spec = LinkSpec {
                ifaces: Vec::new(),
                mtu: 1500,
                bandwidth_mbps: 1000,
                source: LinkSource::Explicit,
            };
            g.add_link(a, b, spec).unwrap();
        }
        g
    }

    #[test]
    fn test_triangle_has_one_cycle() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = cycle_basis(&g);
        assert_eq!(cycles.len(), 1);
        let mut nodes = cycles[0].clone();
        nodes.sort();
        assert_eq!(nodes, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tree_has_no_cycles() {
        let g = graph(&["A", "B", "C", "D"], &[("A", "B"), ("A", "C"), ("C", "D")]);
        assert!(cycle_basis(&g).is_empty());
    }

    #[test]
    fn test_cycle_count_matches_rank() {
        // Two squares sharing an edge: E - V + C = 7 - 6 + 1 = 2
        let g = graph(
            &["A", "B", "C", "D", "E", "F"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("C", "E"), ("E", "F"), ("F", "D")],
        );
        let cycles = cycle_basis(&g);
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().all(|c| c.len() == 4));
    }

    #[test]
    fn test_disconnected_components() {
        let g = graph(
            &["A", "B", "C", "X", "Y", "Z"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("X", "Y"), ("Y", "Z"), ("Z", "X")],
        );
        assert_eq!(cycle_basis(&g).len(), 2);
    }
}
