use std::fmt;

use serde::Serialize;

/// A structural finding about the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The same address appears twice within one VLAN
    DuplicateIp {
        ip: String,
        vlan: u32,
        /// `device:interface` that declared the address first
        first_owner: String,
        /// `device:interface` of the repeated declaration
        second_owner: String,
    },
    /// The two ends of a link face each other with different MTUs
    MtuMismatch {
        device_a: String,
        mtu_a: u32,
        device_b: String,
        mtu_b: u32,
    },
    /// The default gateway is outside every local interface subnet
    BadGateway { device: String, gateway: String },
    /// An independent cycle of devices
    NetworkLoop { nodes: Vec<String> },
}

impl ValidationIssue {
    /// Short machine-friendly label
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationIssue::DuplicateIp { .. } => "duplicate_ip",
            ValidationIssue::MtuMismatch { .. } => "mtu_mismatch",
            ValidationIssue::BadGateway { .. } => "bad_gateway",
            ValidationIssue::NetworkLoop { .. } => "network_loop",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::DuplicateIp {
                ip,
                vlan,
                first_owner,
                second_owner,
            } => write!(f, "Duplicate IP {} in VLAN {}: {} and {}", ip, vlan, first_owner, second_owner),
            ValidationIssue::MtuMismatch {
                device_a,
                mtu_a,
                device_b,
                mtu_b,
            } => write!(
                f,
                "MTU mismatch between {} ({}) and {} ({})",
                device_a, mtu_a, device_b, mtu_b
            ),
            ValidationIssue::BadGateway { device, gateway } => write!(
                f,
                "Default gateway {} on {} not in any local interface subnet",
                gateway, device
            ),
            ValidationIssue::NetworkLoop { nodes } => {
                write!(f, "Network loop detected among nodes: {}", nodes.join(" -> "))
            }
        }
    }
}
