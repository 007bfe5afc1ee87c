use std::net::Ipv4Addr;

/// IPv4 helpers for subnet matching between interfaces

/// Errors produced while turning an address/mask pair into a subnet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("Invalid IPv4 address '{0}'")]
    InvalidAddress(String),
    #[error("Invalid netmask '{0}'")]
    InvalidMask(String),
}

/// An IPv4 network as `network address / prefix length`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Subnet {
    network: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Subnet {
    /// Build the subnet containing `ip` under `mask`.
    ///
    /// The mask may be dotted-quad (`255.255.255.0`), a bare prefix length
    /// (`24`) or a slash prefix (`/24`). Host bits of `ip` are cleared, the
    /// same as a non-strict network constructor.
    pub fn from_ip_mask(ip: &str, mask: &str) -> Result<Self, SubnetError> {
        let addr = parse_ipv4(ip)?;
        let prefix_len = parse_mask(mask)?;
        Ok(Self {
            network: Ipv4Addr::from(u32::from(addr) & prefix_to_bits(prefix_len)),
            prefix_len,
        })
    }

    /// Network address of this subnet
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Prefix length of this subnet
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Check whether `addr` falls inside this subnet
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & prefix_to_bits(self.prefix_len) == u32::from(self.network)
    }
}

impl std::fmt::Display for Ipv4Subnet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// Parse a dotted-quad IPv4 address, tolerating surrounding whitespace
pub fn parse_ipv4(ip: &str) -> Result<Ipv4Addr, SubnetError> {
    ip.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| SubnetError::InvalidAddress(ip.to_string()))
}

fn parse_mask(mask: &str) -> Result<u8, SubnetError> {
    let trimmed = mask.trim();
    let invalid = || SubnetError::InvalidMask(mask.to_string());

    let prefix = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
        return match prefix.parse::<u8>() {
            Ok(len) if len <= 32 => Ok(len),
            _ => Err(invalid()),
        };
    }

    let bits = u32::from(trimmed.parse::<Ipv4Addr>().map_err(|_| invalid())?);
    // Contiguous masks only: ones followed by zeros
    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(invalid());
    }
    Ok(bits.leading_ones() as u8)
}

fn prefix_to_bits(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix_len))
    }
}

/// Subnet of an optional address/mask pair.
///
/// Anything missing or malformed yields `None` so callers can treat it as
/// "no match"; malformed input is logged at debug level.
pub fn subnet_of(ip: Option<&str>, mask: Option<&str>) -> Option<Ipv4Subnet> {
    let (ip, mask) = (ip?, mask?);
    match Ipv4Subnet::from_ip_mask(ip, mask) {
        Ok(subnet) => Some(subnet),
        Err(e) => {
            log::debug!("Ignoring unusable address {}/{}: {}", ip, mask, e);
            None
        }
    }
}
