//! Topology construction.
//!
//! Builds a [`TopologyGraph`] from device records, taking explicit links
//! first and then inferring links for every still-unconnected device pair.
//! Inference tries, in order, an interface description naming the other
//! device and then a shared subnet; the first match wins.

use crate::device::{DeviceRecord, InterfaceRecord, DEFAULT_MTU};
use crate::utils::ip_utils::subnet_of;

use super::graph::{LinkSource, LinkSpec, TopologyGraph};
use super::links::ExplicitLink;

/// Build the topology graph.
///
/// Devices become nodes in slice order. Explicit links naming an unknown
/// device or interface are skipped with a warning. The result depends only
/// on the order of `devices`, their interfaces and `explicit_links`.
pub fn build_topology(devices: &[DeviceRecord], explicit_links: &[ExplicitLink]) -> TopologyGraph {
    let mut graph = TopologyGraph::new();

    for device in devices {
        if !graph.add_device(device.clone()) {
            log::warn!("Duplicate device {}, later record replaces earlier", device.hostname);
        }
    }
    log::info!("Added {} device nodes", graph.node_count());

    for device in devices {
        for iface in device.interfaces() {
            log::debug!(
                "Device {} iface {} IP: {:?} Mask: {:?}",
                device.hostname,
                iface.name,
                iface.ip,
                iface.mask
            );
        }
    }

    for link in explicit_links {
        add_explicit_link(&mut graph, link);
    }

    // Pairs are taken over the node order of the graph so that a replaced
    // duplicate hostname is only considered once.
    let hostnames: Vec<String> = graph.hostnames().map(str::to_string).collect();
    for i in 0..hostnames.len() {
        for j in (i + 1)..hostnames.len() {
            let (a, b) = (&hostnames[i], &hostnames[j]);
            if graph.has_link(a, b) {
                continue;
            }
            let (Some(da), Some(db)) = (graph.device(a), graph.device(b)) else {
                continue;
            };
            if let Some(spec) = infer_link(da, db) {
                let source = spec.source;
                match graph.add_link(a, b, spec) {
                    Ok(()) => log::info!("Inferred edge ({}) {} <-> {}", source, a, b),
                    Err(e) => log::warn!("Inferred edge {} <-> {} rejected: {}", a, b, e),
                }
            }
        }
    }

    log::info!(
        "Final topology: nodes={} edges={}",
        graph.node_count(),
        graph.link_count()
    );
    graph
}

fn add_explicit_link(graph: &mut TopologyGraph, link: &ExplicitLink) {
    let (a, b) = (&link.a, &link.b);
    let (Some(dev_a), Some(dev_b)) = (graph.device(&a.device), graph.device(&b.device)) else {
        log::warn!(
            "Explicit link skipped, unknown device(s): {}, {}",
            a.device,
            b.device
        );
        return;
    };
    let Some(if_a) = dev_a.interface(&a.interface) else {
        log::warn!("Interface '{}' not found on device '{}', skipping edge", a.interface, a.device);
        return;
    };
    let Some(if_b) = dev_b.interface(&b.interface) else {
        log::warn!("Interface '{}' not found on device '{}', skipping edge", b.interface, b.device);
        return;
    };

    let spec = LinkSpec {
        ifaces: vec![a.label(), b.label()],
        mtu: if_a.effective_mtu().min(if_b.effective_mtu()),
        bandwidth_mbps: if_a.effective_bandwidth().min(if_b.effective_bandwidth()),
        source: LinkSource::Explicit,
    };
    let (mtu, bw) = (spec.mtu, spec.bandwidth_mbps);

    // A repeated pair in the link file: the later line wins
    if graph.has_link(&a.device, &b.device) {
        log::warn!(
            "Explicit link {} - {} overrides an earlier link between {} and {}",
            a.label(),
            b.label(),
            a.device,
            b.device
        );
        graph.replace_link_attributes(&a.device, &b.device, spec);
        return;
    }

    match graph.add_link(&a.device, &b.device, spec) {
        Ok(()) => log::info!(
            "Added explicit edge {}({}) <-> {}({}) mtu={} bw={}",
            a.device,
            a.interface,
            b.device,
            b.interface,
            mtu,
            bw
        ),
        Err(e) => log::warn!("Explicit link {} - {} skipped: {}", a.label(), b.label(), e),
    }
}

/// Infer a link from `a` towards `b`, or `None` when nothing matches
fn infer_link(a: &DeviceRecord, b: &DeviceRecord) -> Option<LinkSpec> {
    description_hint(a, b).or_else(|| shared_subnet(a, b))
}

fn description_hint(a: &DeviceRecord, b: &DeviceRecord) -> Option<LinkSpec> {
    let iface = a.interfaces().find(|iface| iface.describes(&b.hostname))?;
    Some(LinkSpec {
        ifaces: vec![endpoint(a, iface)],
        mtu: iface.effective_mtu().min(DEFAULT_MTU),
        bandwidth_mbps: iface.effective_bandwidth(),
        source: LinkSource::DescHint,
    })
}

fn shared_subnet(a: &DeviceRecord, b: &DeviceRecord) -> Option<LinkSpec> {
    for if_a in a.interfaces().filter(|i| i.has_address()) {
        let Some(net_a) = subnet_of(if_a.ip.as_deref(), if_a.mask.as_deref()) else {
            log::warn!("Subnet check skipped for {}:{}, unusable address", a.hostname, if_a.name);
            continue;
        };
        for if_b in b.interfaces().filter(|i| i.has_address()) {
            if subnet_of(if_b.ip.as_deref(), if_b.mask.as_deref()) == Some(net_a) {
                return Some(LinkSpec {
                    ifaces: vec![endpoint(a, if_a), endpoint(b, if_b)],
                    mtu: if_a.effective_mtu().min(if_b.effective_mtu()),
                    bandwidth_mbps: if_a.effective_bandwidth().min(if_b.effective_bandwidth()),
                    source: LinkSource::Subnet,
                });
            }
        }
    }
    None
}

fn endpoint(device: &DeviceRecord, iface: &InterfaceRecord) -> String {
    format!("{}:{}", device.hostname, iface.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::links::parse_links_text;

    fn router(name: &str, ifaces: Vec<InterfaceRecord>) -> DeviceRecord {
        ifaces
            .into_iter()
            .fold(DeviceRecord::new(name), |d, i| d.with_interface(i))
    }

    #[test]
    fn test_explicit_link_takes_min_attributes() {
        let devices = vec![
            router("R1", vec![InterfaceRecord::new("Gig0/0").with_mtu(9000).with_bandwidth(10000)]),
            router("R2", vec![InterfaceRecord::new("Gig0/1").with_mtu(1400)]),
        ];
        let links = parse_links_text("R1:Gig0/0 - R2:GIG0/1\n");
        let graph = build_topology(&devices, &links);

        let link = graph.link("R1", "R2").unwrap();
        assert_eq!(link.source(), LinkSource::Explicit);
        assert_eq!(link.ifaces(), &["R1:gig0/0".to_string(), "R2:gig0/1".to_string()]);
        assert_eq!(link.mtu(), 1400);
        assert_eq!(link.bandwidth_mbps(), 1000);
        assert!(link.is_up());
    }

    #[test]
    fn test_explicit_link_unknown_interface_skipped() {
        let devices = vec![
            router("R1", vec![InterfaceRecord::new("Gig0/0")]),
            router("R2", vec![InterfaceRecord::new("Gig0/0")]),
        ];
        let links = parse_links_text("R1:Gig0/9 - R2:Gig0/0\nR1:Gig0/0 - R9:Gig0/0\n");
        let graph = build_topology(&devices, &links);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_description_hint_is_single_sided() {
        let devices = vec![
            router(
                "R1",
                vec![
                    InterfaceRecord::new("Gig0/0").with_description("to core"),
                    InterfaceRecord::new("Gig0/1").with_description("uplink R2").with_mtu(9000).with_bandwidth(100),
                ],
            ),
            router("R2", vec![InterfaceRecord::new("Gig0/0")]),
        ];
        let graph = build_topology(&devices, &[]);
        let link = graph.link("R1", "R2").unwrap();
        assert_eq!(link.source(), LinkSource::DescHint);
        assert_eq!(link.ifaces(), &["R1:gig0/1".to_string()]);
        assert_eq!(link.mtu(), 1500);
        assert_eq!(link.bandwidth_mbps(), 100);
    }

    #[test]
    fn test_description_hint_beats_subnet() {
        let devices = vec![
            router(
                "R1",
                vec![
                    InterfaceRecord::new("Gig0/0").with_address("10.0.0.1", "255.255.255.0"),
                    InterfaceRecord::new("Gig0/1").with_description("R2 backup"),
                ],
            ),
            router("R2", vec![InterfaceRecord::new("Gig0/0").with_address("10.0.0.2", "255.255.255.0")]),
        ];
        let graph = build_topology(&devices, &[]);
        assert_eq!(graph.link("R1", "R2").unwrap().source(), LinkSource::DescHint);
    }

    #[test]
    fn test_subnet_inference() {
        let devices = vec![
            router(
                "R1",
                vec![
                    InterfaceRecord::new("Gig0/0").with_address("bad", "255.255.255.0"),
                    InterfaceRecord::new("Gig0/1")
                        .with_address("10.0.12.1", "255.255.255.0")
                        .with_mtu(1400),
                ],
            ),
            router(
                "R2",
                vec![InterfaceRecord::new("Gig0/2")
                    .with_address("10.0.12.2", "255.255.255.0")
                    .with_bandwidth(100)],
            ),
            router("R3", vec![InterfaceRecord::new("Gig0/0").with_address("10.0.12.3", "255.255.0.0")]),
        ];
        let graph = build_topology(&devices, &[]);

        let link = graph.link("R1", "R2").unwrap();
        assert_eq!(link.source(), LinkSource::Subnet);
        assert_eq!(link.ifaces(), &["R1:gig0/1".to_string(), "R2:gig0/2".to_string()]);
        assert_eq!(link.mtu(), 1400);
        assert_eq!(link.bandwidth_mbps(), 100);
        // Different prefix length, no link
        assert!(!graph.has_link("R1", "R3"));
        assert!(!graph.has_link("R2", "R3"));
    }

    #[test]
    fn test_explicit_link_blocks_inference() {
        let devices = vec![
            router(
                "R1",
                vec![
                    InterfaceRecord::new("Gig0/0").with_description("R2"),
                    InterfaceRecord::new("Gig0/1"),
                ],
            ),
            router("R2", vec![InterfaceRecord::new("Gig0/0")]),
        ];
        let links = parse_links_text("R1:Gig0/1 - R2:Gig0/0");
        let graph = build_topology(&devices, &links);
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.link("R1", "R2").unwrap().source(), LinkSource::Explicit);
    }

    #[test]
    fn test_repeated_explicit_pair_last_line_wins() {
        let devices = vec![
            router(
                "R1",
                vec![
                    InterfaceRecord::new("g0").with_mtu(9000),
                    InterfaceRecord::new("g1").with_mtu(1400),
                ],
            ),
            router(
                "R2",
                vec![
                    InterfaceRecord::new("g0").with_mtu(9000),
                    InterfaceRecord::new("g1").with_mtu(1400).with_bandwidth(100),
                ],
            ),
        ];
        let links = parse_links_text("R1:g0 - R2:g0\nR2:g1 - R1:g1\n");
        let graph = build_topology(&devices, &links);

        assert_eq!(graph.link_count(), 1);
        let link = graph.link("R1", "R2").unwrap();
        assert_eq!(link.ifaces(), &["R2:g1".to_string(), "R1:g1".to_string()]);
        assert_eq!(link.mtu(), 1400);
        assert_eq!(link.bandwidth_mbps(), 100);
        assert_eq!(link.key(), "R1-R2");
        assert!(link.is_up());
    }
}
