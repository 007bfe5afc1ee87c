//! Topology validation.
//!
//! Structural findings are returned as [`ValidationIssue`] values rather
//! than errors; callers decide how to render them.

pub mod checks;
pub mod cycles;
pub mod issue;

pub use checks::{check_duplicate_ips, check_gateways, check_loops, check_mtu_mismatches, validate_topology};
pub use cycles::cycle_basis;
pub use issue::ValidationIssue;
