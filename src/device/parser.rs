//! Config dump parsing.
//!
//! Turns Cisco-like configuration text (`.dump`, `.cfg`, `.txt`) into
//! [`DeviceRecord`]s. Parsing is lenient: anything that does not match a
//! known statement is ignored, and a file that cannot be read is skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use super::types::{DeviceRecord, InterfaceRecord};

/// File extensions recognized as configuration dumps
pub const CONFIG_EXTENSIONS: [&str; 3] = ["dump", "cfg", "txt"];

/// File name of the explicit link list, never parsed as a device
pub const LINKS_FILE_NAME: &str = "links.txt";

/// Compiled regex patterns for config parsing
pub struct ConfigPatterns {
    /// Match: "hostname R1" at line start
    pub hostname: Regex,
    /// Split point: "interface Gig0/0" at line start
    pub interface_start: Regex,
    /// Match: "ip address 10.0.0.1 255.255.255.0"
    pub ip_address: Regex,
    /// Match: "mtu 9000"
    pub mtu: Regex,
    /// Match: "bandwidth 100"
    pub bandwidth: Regex,
    /// Match: "description uplink to R2"
    pub description: Regex,
    /// Match: "switchport access vlan 20"
    pub access_vlan: Regex,
    /// Match: "vlan 20" at line start
    pub vlan_declaration: Regex,
    /// Match: "ip default-gateway 10.0.0.254"
    pub default_gateway: Regex,
    /// Match: "ip route 0.0.0.0 0.0.0.0 10.0.0.254"
    pub default_route: Regex,
}

impl ConfigPatterns {
    pub fn new() -> Self {
        Self {
            hostname: Regex::new(r"(?m)^hostname\s+(\S+)").expect("Invalid hostname regex"),
            interface_start: Regex::new(r"(?m)^interface\s+").expect("Invalid interface_start regex"),
            ip_address: Regex::new(r"ip address\s+(\d+\.\d+\.\d+\.\d+)\s+(\d+\.\d+\.\d+\.\d+)")
                .expect("Invalid ip_address regex"),
            mtu: Regex::new(r"\bmtu\s+(\d+)").expect("Invalid mtu regex"),
            bandwidth: Regex::new(r"\bbandwidth\s+(\d+)").expect("Invalid bandwidth regex"),
            description: Regex::new(r"description\s+(.+)").expect("Invalid description regex"),
            access_vlan: Regex::new(r"switchport access vlan\s+(\d+)").expect("Invalid access_vlan regex"),
            vlan_declaration: Regex::new(r"(?m)^vlan\s+(\d+)").expect("Invalid vlan_declaration regex"),
            default_gateway: Regex::new(r"(?m)^\s*ip default-gateway\s+(\S+)")
                .expect("Invalid default_gateway regex"),
            default_route: Regex::new(r"(?m)^\s*ip route\s+0\.0\.0\.0\s+0\.0\.0\.0\s+(\d+\.\d+\.\d+\.\d+)")
                .expect("Invalid default_route regex"),
        }
    }
}

impl Default for ConfigPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<ConfigPatterns> = LazyLock::new(ConfigPatterns::new);

fn capture_number(re: &Regex, text: &str, what: &str) -> Option<u32> {
    let raw = re.captures(text)?.get(1)?.as_str();
    match raw.parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring out-of-range {} value '{}'", what, raw);
            None
        }
    }
}

fn parse_interface_block(block: &str) -> Option<InterfaceRecord> {
    let mut lines = block.lines();
    let name = lines.next()?.split_whitespace().next()?;
    let body = lines.collect::<Vec<_>>().join("\n");

    let mut iface = InterfaceRecord::new(name);
    if let Some(caps) = PATTERNS.ip_address.captures(&body) {
        iface.ip = Some(caps[1].to_string());
        iface.mask = Some(caps[2].to_string());
    }
    iface.mtu = capture_number(&PATTERNS.mtu, &body, "mtu");
    iface.bandwidth_mbps = capture_number(&PATTERNS.bandwidth, &body, "bandwidth");
    iface.description = PATTERNS
        .description
        .captures(&body)
        .map(|caps| caps[1].trim().to_string());
    iface.vlan = capture_number(&PATTERNS.access_vlan, &body, "vlan");

    Some(iface)
}

/// Parse configuration text into a device record.
///
/// `fallback_hostname` is used when the text has no `hostname` statement.
pub fn parse_config_text(content: &str, fallback_hostname: &str) -> DeviceRecord {
    let hostname = PATTERNS
        .hostname
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| fallback_hostname.to_string());

    let mut device = DeviceRecord::new(hostname);

    // The first chunk precedes any interface statement
    for block in PATTERNS.interface_start.split(content).skip(1) {
        if let Some(iface) = parse_interface_block(block) {
            device.insert_interface(iface);
        }
    }

    for caps in PATTERNS.vlan_declaration.captures_iter(content) {
        match caps[1].parse::<u32>() {
            Ok(vlan) => {
                device.vlans.insert(vlan);
            }
            Err(_) => log::warn!("Ignoring out-of-range vlan declaration '{}'", &caps[1]),
        }
    }

    device.default_gateway = PATTERNS
        .default_gateway
        .captures(content)
        .or_else(|| PATTERNS.default_route.captures(content))
        .map(|caps| caps[1].to_string());

    log::info!(
        "Parsed {} ({} interfaces, {} vlans)",
        device.hostname,
        device.interface_count(),
        device.vlans.len()
    );
    device
}

/// Parse one configuration dump file
pub fn parse_config_file(path: &Path) -> Result<DeviceRecord> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_config_text(&content, &stem))
}

fn is_config_file(path: &Path) -> bool {
    let is_links_file = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().eq_ignore_ascii_case(LINKS_FILE_NAME));
    let has_config_ext = path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        CONFIG_EXTENSIONS.contains(&ext.as_str())
    });
    has_config_ext && !is_links_file
}

fn collect_config_files(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_config_files(&path, found);
        } else if file_type.is_symlink() && path.is_dir() {
            // Linked directories are not followed, they may loop back
            log::debug!("Not following directory link {}", path.display());
        } else if is_config_file(&path) {
            found.push(path);
        }
    }
}

/// Parse every configuration dump under `dir`, recursively.
///
/// Files are visited in sorted path order so the resulting device order is
/// stable. A later file declaring an already-seen hostname replaces the
/// earlier record in place. A missing directory yields an empty list.
pub fn parse_all_configs(dir: &Path) -> Vec<DeviceRecord> {
    if !dir.is_dir() {
        log::error!("Config dir not found: {}", dir.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    collect_config_files(dir, &mut files);
    files.sort();

    let parsed: Vec<DeviceRecord> = files
        .par_iter()
        .filter_map(|path| match parse_config_file(path) {
            Ok(device) => Some(device),
            Err(e) => {
                log::warn!("Skipping {}: {:#}", path.display(), e);
                None
            }
        })
        .collect();

    let mut devices: Vec<DeviceRecord> = Vec::with_capacity(parsed.len());
    for device in parsed {
        match devices.iter_mut().find(|d| d.hostname == device.hostname) {
            Some(existing) => {
                log::warn!("Duplicate hostname {}, keeping the later config", device.hostname);
                *existing = device;
            }
            None => devices.push(device),
        }
    }

    log::info!("Parsed {} device configs from {}", devices.len(), dir.display());
    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const ROUTER: &str = "hostname R1
!
interface GigabitEthernet0/0
 description link to R2
 ip address 10.0.12.1 255.255.255.0
 mtu 9000
 bandwidth 100
!
interface Vlan20
 switchport access vlan 20
 ip address 192.168.20.1 255.255.255.0
!
vlan 30
ip default-gateway 10.0.12.254
";

    #[test]
    fn test_parse_router_config() {
        let device = parse_config_text(ROUTER, "fallback");
        assert_eq!(device.hostname, "R1");
        assert_eq!(device.interface_count(), 2);

        let gig = device.interface("gigabitethernet0/0").unwrap();
        assert_eq!(gig.ip.as_deref(), Some("10.0.12.1"));
        assert_eq!(gig.mask.as_deref(), Some("255.255.255.0"));
        assert_eq!(gig.mtu, Some(9000));
        assert_eq!(gig.bandwidth_mbps, Some(100));
        assert_eq!(gig.description.as_deref(), Some("link to R2"));
        assert_eq!(gig.vlan, None);

        let svi = device.interface("Vlan20").unwrap();
        assert_eq!(svi.vlan, Some(20));
        assert!(device.vlans.contains(&20));
        assert!(device.vlans.contains(&30));
        assert_eq!(device.default_gateway.as_deref(), Some("10.0.12.254"));
    }

    #[test]
    fn test_fallback_hostname_and_default_route() {
        let text = "interface Eth0\n ip address 192.168.1.1 255.255.255.0\n!\nip route 0.0.0.0 0.0.0.0 192.168.1.254\n";
        let device = parse_config_text(text, "M1");
        assert_eq!(device.hostname, "M1");
        assert_eq!(device.default_gateway.as_deref(), Some("192.168.1.254"));
    }

    #[test]
    fn test_interface_without_settings() {
        let text = "hostname S1\ninterface Fa0/1\n switchport mode access\n!\n";
        let device = parse_config_text(text, "x");
        let iface = device.interface("fa0/1").unwrap();
        assert!(iface.ip.is_none());
        assert!(iface.mtu.is_none());
        assert!(device.default_gateway.is_none());
    }

    #[test]
    fn test_parse_all_configs_walks_and_skips_links_file() {
        let dir = TempDir::new().unwrap();
        let r2_dir = dir.path().join("R2");
        fs::create_dir(&r2_dir).unwrap();

        fs::write(dir.path().join("r1.cfg"), ROUTER).unwrap();
        let mut f = fs::File::create(r2_dir.join("config.dump")).unwrap();
        writeln!(f, "hostname R2\ninterface Gig0/0\n ip address 10.0.12.2 255.255.255.0").unwrap();
        fs::write(dir.path().join("links.txt"), "R1:gig0/0 - R2:gig0/0\n").unwrap();
        fs::write(dir.path().join("notes.md"), "hostname NOPE\n").unwrap();

        let devices = parse_all_configs(dir.path());
        let names: Vec<_> = devices.iter().map(|d| d.hostname.as_str()).collect();
        assert_eq!(names, vec!["R2", "R1"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        fs::create_dir(&site).unwrap();
        fs::write(site.join("r1.cfg"), ROUTER).unwrap();

        // site/loop -> root, a cycle when followed
        std::os::unix::fs::symlink(dir.path(), site.join("loop")).unwrap();
        // A linked file is still read
        fs::write(dir.path().join("r2.conf"), "hostname R2\n").unwrap();
        std::os::unix::fs::symlink(dir.path().join("r2.conf"), site.join("r2-link.cfg")).unwrap();

        let devices = parse_all_configs(dir.path());
        let names: Vec<_> = devices.iter().map(|d| d.hostname.as_str()).collect();
        assert_eq!(names, vec!["R1", "R2"]);
    }

    #[test]
    fn test_missing_dir_yields_empty() {
        assert!(parse_all_configs(Path::new("/definitely/not/here")).is_empty());
    }
}
