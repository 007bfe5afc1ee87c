//! Topology validation checks.
//!
//! Four independent checks run in a fixed order and their findings are
//! concatenated: duplicate addresses per VLAN, MTU mismatches across links,
//! default gateways outside local subnets, and loops. An unusable address
//! or mask only disqualifies the interface it belongs to.

use crate::device::{DeviceRecord, InterfaceRecord};
use crate::topology::TopologyGraph;
use crate::utils::ip_utils::{parse_ipv4, subnet_of};

use super::cycles::cycle_basis;
use super::issue::ValidationIssue;

/// Validate the topology, returning every finding in check order
pub fn validate_topology(graph: &TopologyGraph) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    issues.extend(check_duplicate_ips(graph));
    issues.extend(check_mtu_mismatches(graph));
    issues.extend(check_gateways(graph));
    issues.extend(check_loops(graph));

    log::info!("Validation complete, {} issues found", issues.len());
    issues
}

/// Same address declared more than once inside a VLAN.
///
/// VLANs are reported in order of first appearance; within a VLAN the
/// first declaration owns the address and every repeat is reported.
pub fn check_duplicate_ips(graph: &TopologyGraph) -> Vec<ValidationIssue> {
    // (vlan, [(owner, ip)]) in first-seen order
    let mut by_vlan: Vec<(u32, Vec<(String, &str)>)> = Vec::new();

    for device in graph.devices() {
        for iface in device.interfaces() {
            let (Some(vlan), Some(ip)) = (iface.vlan, iface.ip.as_deref()) else {
                continue;
            };
            if vlan == 0 {
                continue;
            }
            let owner = format!("{}:{}", device.hostname, iface.name);
            match by_vlan.iter_mut().find(|(v, _)| *v == vlan) {
                Some((_, entries)) => entries.push((owner, ip)),
                None => by_vlan.push((vlan, vec![(owner, ip)])),
            }
        }
    }

    let mut issues = Vec::new();
    for (vlan, entries) in &by_vlan {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for (owner, ip) in entries {
            match seen.iter().find(|(seen_ip, _)| seen_ip == ip) {
                Some((_, first_owner)) => issues.push(ValidationIssue::DuplicateIp {
                    ip: ip.to_string(),
                    vlan: *vlan,
                    first_owner: first_owner.to_string(),
                    second_owner: owner.clone(),
                }),
                None => seen.push((ip, owner)),
            }
        }
    }
    issues
}

/// Links whose two ends resolve to different facing MTUs
pub fn check_mtu_mismatches(graph: &TopologyGraph) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for link in graph.links() {
        let (u, v) = link.devices();
        let (Some(dev_u), Some(dev_v)) = (graph.device(u), graph.device(v)) else {
            continue;
        };
        if let (Some(mtu_u), Some(mtu_v)) = (facing_mtu(dev_u, dev_v), facing_mtu(dev_v, dev_u)) {
            if mtu_u != mtu_v {
                issues.push(ValidationIssue::MtuMismatch {
                    device_a: u.to_string(),
                    mtu_a: mtu_u,
                    device_b: v.to_string(),
                    mtu_b: mtu_v,
                });
            }
        }
    }
    issues
}

/// MTU of the interface on `device` that faces `neighbor`.
///
/// Prefers an interface whose description names the neighbor and declares
/// an MTU. Otherwise the first interface sharing a network address with one
/// of the neighbor's interfaces decides: its own MTU, else the neighbor
/// interface's MTU, else none.
fn facing_mtu(device: &DeviceRecord, neighbor: &DeviceRecord) -> Option<u32> {
    if let Some(mtu) = device
        .interfaces()
        .filter(|iface| iface.describes(&neighbor.hostname))
        .find_map(|iface| iface.mtu)
    {
        return Some(mtu);
    }

    for iface in device.interfaces().filter(|i| i.has_address()) {
        let Some(local) = network_of(iface) else {
            continue;
        };
        for other in neighbor.interfaces().filter(|i| i.has_address()) {
            if network_of(other).is_some_and(|remote| remote.network() == local.network()) {
                return iface.mtu.or(other.mtu);
            }
        }
    }
    None
}

fn network_of(iface: &InterfaceRecord) -> Option<crate::utils::Ipv4Subnet> {
    subnet_of(iface.ip.as_deref(), iface.mask.as_deref())
}

/// Declared default gateways that no local interface subnet contains.
///
/// Devices without a gateway are skipped. An unparsable gateway can never
/// be contained, so it is reported.
pub fn check_gateways(graph: &TopologyGraph) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for device in graph.devices() {
        let Some(gateway) = device.default_gateway.as_deref().filter(|g| !g.is_empty()) else {
            continue;
        };
        let reachable = match parse_ipv4(gateway) {
            Ok(addr) => device
                .interfaces()
                .filter_map(network_of)
                .any(|subnet| subnet.contains(addr)),
            Err(e) => {
                log::debug!("Gateway on {} unusable: {}", device.hostname, e);
                false
            }
        };
        if !reachable {
            issues.push(ValidationIssue::BadGateway {
                device: device.hostname.clone(),
                gateway: gateway.to_string(),
            });
        }
    }
    issues
}

/// One issue per independent cycle
pub fn check_loops(graph: &TopologyGraph) -> Vec<ValidationIssue> {
    cycle_basis(graph)
        .into_iter()
        .map(|nodes| ValidationIssue::NetworkLoop { nodes })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{build_topology, parse_links_text};

    fn dev(name: &str, ifaces: Vec<InterfaceRecord>) -> DeviceRecord {
        ifaces.into_iter().fold(DeviceRecord::new(name), |d, i| d.with_interface(i))
    }

    #[test]
    fn test_duplicate_ip_reported_once_with_both_owners() {
        let devices = vec![
            dev("SW1", vec![InterfaceRecord::new("Vlan10").with_vlan(10).with_address("10.0.10.5", "255.255.255.0")]),
            dev("SW2", vec![InterfaceRecord::new("Vlan10").with_vlan(10).with_address("10.0.10.5", "255.255.255.0")]),
            dev("SW3", vec![InterfaceRecord::new("Vlan20").with_vlan(20).with_address("10.0.10.5", "255.255.255.0")]),
        ];
        let graph = build_topology(&devices, &[]);
        let issues = check_duplicate_ips(&graph);
        assert_eq!(
            issues,
            vec![ValidationIssue::DuplicateIp {
                ip: "10.0.10.5".into(),
                vlan: 10,
                first_owner: "SW1:vlan10".into(),
                second_owner: "SW2:vlan10".into(),
            }]
        );
    }

    #[test]
    fn test_mtu_mismatch_via_description() {
        let devices = vec![
            dev("R1", vec![InterfaceRecord::new("Gig0/0").with_description("to R2").with_mtu(9000)]),
            dev("R2", vec![InterfaceRecord::new("Gig0/0").with_description("to R1").with_mtu(1500)]),
        ];
        let graph = build_topology(&devices, &[]);
        let issues = check_mtu_mismatches(&graph);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "MTU mismatch between R1 (9000) and R2 (1500)");
    }

    #[test]
    fn test_mtu_mismatch_via_subnet() {
        let devices = vec![
            dev("R1", vec![InterfaceRecord::new("Gig0/0").with_address("10.0.0.1", "255.255.255.252").with_mtu(1400)]),
            dev("R2", vec![InterfaceRecord::new("Gig0/0").with_address("10.0.0.2", "255.255.255.252").with_mtu(1500)]),
        ];
        let graph = build_topology(&devices, &[]);
        assert_eq!(check_mtu_mismatches(&graph).len(), 1);
    }

    #[test]
    fn test_mtu_match_or_unknown_is_silent() {
        let devices = vec![
            dev("R1", vec![InterfaceRecord::new("Gig0/0").with_address("10.0.0.1", "255.255.255.0")]),
            dev("R2", vec![InterfaceRecord::new("Gig0/0").with_address("10.0.0.2", "255.255.255.0").with_mtu(1500)]),
            dev("R3", vec![InterfaceRecord::new("Gig0/0")]),
        ];
        let links = parse_links_text("R1:Gig0/0 - R3:Gig0/0");
        let graph = build_topology(&devices, &links);
        // R1 borrows R2's MTU for the shared subnet; R3 has nothing to resolve
        assert!(check_mtu_mismatches(&graph).is_empty());
    }

    #[test]
    fn test_gateway_checks() {
        let devices = vec![
            dev("H1", vec![InterfaceRecord::new("Eth0").with_address("192.168.1.10", "255.255.255.0")])
                .with_gateway("192.168.1.1"),
            dev("H2", vec![InterfaceRecord::new("Eth0").with_address("192.168.2.10", "255.255.255.0")])
                .with_gateway("192.168.1.1"),
            dev("H3", vec![InterfaceRecord::new("Eth0").with_address("bogus", "255.255.255.0")])
                .with_gateway("not-an-ip"),
            dev("H4", vec![]),
        ];
        let graph = build_topology(&devices, &[]);
        let issues = check_gateways(&graph);
        let devices: Vec<_> = issues
            .iter()
            .map(|i| match i {
                ValidationIssue::BadGateway { device, .. } => device.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(devices, vec!["H2", "H3"]);
    }

    #[test]
    fn test_checks_run_in_fixed_order() {
        let devices = vec![
            dev(
                "A",
                vec![
                    InterfaceRecord::new("Gig0/0").with_description("B").with_mtu(9000),
                    InterfaceRecord::new("Gig0/1").with_description("C"),
                    InterfaceRecord::new("Vlan5").with_vlan(5).with_address("10.5.0.1", "255.255.255.0"),
                ],
            )
            .with_gateway("172.16.0.1"),
            dev(
                "B",
                vec![
                    InterfaceRecord::new("Gig0/0").with_description("C").with_mtu(1500),
                    InterfaceRecord::new("Vlan5").with_vlan(5).with_address("10.5.0.1", "255.255.255.0"),
                ],
            ),
            dev("C", vec![]),
        ];
        let graph = build_topology(&devices, &[]);
        let kinds: Vec<_> = validate_topology(&graph).iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, vec!["duplicate_ip", "bad_gateway", "network_loop"]);
    }
}
