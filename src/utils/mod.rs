//! Shared utilities: IPv4 subnet helpers and duration parsing.

pub mod duration;
pub mod ip_utils;

pub use duration::parse_duration;
pub use ip_utils::{subnet_of, Ipv4Subnet, SubnetError};
