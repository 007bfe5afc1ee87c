//! Explicit link file parsing.
//!
//! One link per line in the form `R1:Gig0/1 - R2:Gig0/1`. Blank lines and
//! `#` comments are ignored; malformed lines are logged and skipped without
//! stopping the rest of the file.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{Context, Result};

use crate::device::normalize_interface_name;

/// One side of an explicit link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkEndpoint {
    pub device: String,
    /// Normalized (lower-case) interface name
    pub interface: String,
}

impl LinkEndpoint {
    /// Render as `device:interface`
    pub fn label(&self) -> String {
        format!("{}:{}", self.device, self.interface)
    }
}

/// Errors for a single `device:interface` endpoint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointParseError {
    #[error("endpoint '{0}' is not in device:interface form")]
    MissingColon(String),
    #[error("endpoint '{0}' has an empty device or interface")]
    EmptyPart(String),
}

impl FromStr for LinkEndpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device, interface) = s
            .split_once(':')
            .ok_or_else(|| EndpointParseError::MissingColon(s.to_string()))?;
        let device = device.trim();
        let interface = normalize_interface_name(interface);
        if device.is_empty() || interface.is_empty() {
            return Err(EndpointParseError::EmptyPart(s.to_string()));
        }
        Ok(Self {
            device: device.to_string(),
            interface,
        })
    }
}

/// A link declared in the link file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitLink {
    pub a: LinkEndpoint,
    pub b: LinkEndpoint,
}

/// Errors for a whole link line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkLineError {
    #[error("missing '-' separator")]
    MissingSeparator,
    #[error(transparent)]
    Endpoint(#[from] EndpointParseError),
}

/// Parse one non-comment link line
pub fn parse_link_line(line: &str) -> Result<ExplicitLink, LinkLineError> {
    let (left, right) = line.split_once('-').ok_or(LinkLineError::MissingSeparator)?;
    Ok(ExplicitLink {
        a: left.trim().parse()?,
        b: right.trim().parse()?,
    })
}

/// Parse link file text, skipping blank, comment and malformed lines
pub fn parse_links_text(text: &str) -> Vec<ExplicitLink> {
    let mut links = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_link_line(line) {
            Ok(link) => links.push(link),
            Err(e) => log::warn!("Skipping invalid link line {} ({}): {}", lineno + 1, e, line),
        }
    }
    links
}

/// Read and parse a link file
pub fn parse_links_file(path: &Path) -> Result<Vec<ExplicitLink>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read links file: {}", path.display()))?;
    let links = parse_links_text(&text);
    log::info!("Parsed {} links from {}", links.len(), path.display());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let link = parse_link_line("R1:Gig0/1 - SW1:Fa0/24").unwrap();
        assert_eq!(link.a.device, "R1");
        assert_eq!(link.a.interface, "gig0/1");
        assert_eq!(link.b.label(), "SW1:fa0/24");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "
# lab links
R1:Gig0/0 - R2:Gig0/0

R1 R2
R2:Gig0/1 - R3
R3:Gig0/0 -
:Gig0/0 - R4:Gig0/0
R3:Gig0/1 - R4:Gig0/1
";
        let links = parse_links_text(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].a.device, "R1");
        assert_eq!(links[1].b.device, "R4");
    }

    #[test]
    fn test_line_errors() {
        assert_eq!(parse_link_line("R1 R2"), Err(LinkLineError::MissingSeparator));
        assert!(matches!(
            parse_link_line("R1:g0 - R2"),
            Err(LinkLineError::Endpoint(EndpointParseError::MissingColon(_)))
        ));
        assert!(matches!(
            parse_link_line("R1: - R2:g0"),
            Err(LinkLineError::Endpoint(EndpointParseError::EmptyPart(_)))
        ));
    }
}
