//! Device record store.
//!
//! Holds the structured form of parsed device configurations and the
//! lenient config-dump parser that produces them.

pub mod parser;
pub mod types;

pub use parser::{parse_all_configs, parse_config_file, parse_config_text};
pub use types::{
    normalize_interface_name, DeviceRecord, InterfaceRecord, DEFAULT_BANDWIDTH_MBPS, DEFAULT_MTU,
};
