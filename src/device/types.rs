//! Device record type definitions.
//!
//! A [`DeviceRecord`] is the structured form of one parsed configuration
//! dump. Interface names are keys: they are trimmed and lower-cased on
//! insertion, and lookups are case-insensitive.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// MTU assumed for an interface that does not declare one
pub const DEFAULT_MTU: u32 = 1500;

/// Bandwidth (Mbps) assumed for an interface that does not declare one
pub const DEFAULT_BANDWIDTH_MBPS: u32 = 1000;

/// One interface block of a device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth_mbps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u32>,
}

impl InterfaceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, ip: &str, mask: &str) -> Self {
        self.ip = Some(ip.to_string());
        self.mask = Some(mask.to_string());
        self
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = Some(mtu);
        self
    }

    pub fn with_bandwidth(mut self, mbps: u32) -> Self {
        self.bandwidth_mbps = Some(mbps);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_vlan(mut self, vlan: u32) -> Self {
        self.vlan = Some(vlan);
        self
    }

    /// Declared MTU, or [`DEFAULT_MTU`]
    pub fn effective_mtu(&self) -> u32 {
        self.mtu.unwrap_or(DEFAULT_MTU)
    }

    /// Declared bandwidth, or [`DEFAULT_BANDWIDTH_MBPS`]
    pub fn effective_bandwidth(&self) -> u32 {
        self.bandwidth_mbps.unwrap_or(DEFAULT_BANDWIDTH_MBPS)
    }

    /// True when the description mentions `hostname` as a substring
    pub fn describes(&self, hostname: &str) -> bool {
        self.description
            .as_deref()
            .is_some_and(|desc| !desc.is_empty() && desc.contains(hostname))
    }

    /// True when both an address and a mask are declared
    pub fn has_address(&self) -> bool {
        self.ip.is_some() && self.mask.is_some()
    }
}

/// Structured representation of one parsed device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub hostname: String,
    /// Interfaces in declaration order, names normalized to lower case
    interfaces: Vec<InterfaceRecord>,
    pub vlans: BTreeSet<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_gateway: Option<String>,
}

impl DeviceRecord {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Builder-style [`DeviceRecord::insert_interface`]
    pub fn with_interface(mut self, iface: InterfaceRecord) -> Self {
        self.insert_interface(iface);
        self
    }

    pub fn with_gateway(mut self, gateway: &str) -> Self {
        self.default_gateway = Some(gateway.to_string());
        self
    }

    /// Add an interface, normalizing its name.
    ///
    /// A second interface whose name differs only in case replaces the first
    /// one while keeping its original position.
    pub fn insert_interface(&mut self, mut iface: InterfaceRecord) {
        iface.name = normalize_interface_name(&iface.name);
        if let Some(vlan) = iface.vlan {
            self.vlans.insert(vlan);
        }
        match self.interfaces.iter_mut().find(|i| i.name == iface.name) {
            Some(existing) => *existing = iface,
            None => self.interfaces.push(iface),
        }
    }

    /// Case-insensitive interface lookup
    pub fn interface(&self, name: &str) -> Option<&InterfaceRecord> {
        let key = normalize_interface_name(name);
        self.interfaces.iter().find(|i| i.name == key)
    }

    /// Interfaces in declaration order
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceRecord> {
        self.interfaces.iter()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}

/// Trim and lower-case an interface name
pub fn normalize_interface_name(name: &str) -> String {
    name.trim().to_lowercase()
}
