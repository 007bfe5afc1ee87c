//! Messages exchanged during a simulation run.

use std::fmt;

use chrono::{DateTime, Utc};

/// Kind of control-plane message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Hello,
    Arp,
    ArpReply,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Hello => write!(f, "HELLO"),
            MessageKind::Arp => write!(f, "ARP"),
            MessageKind::ArpReply => write!(f, "ARP_REPLY"),
        }
    }
}

/// A message on a simulation queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationMessage {
    pub kind: MessageKind,
    pub src: String,
    /// `None` broadcasts to every neighbor of `src`
    pub dst: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SimulationMessage {
    pub fn new(kind: MessageKind, src: &str, dst: Option<&str>) -> Self {
        Self {
            kind,
            src: src.to_string(),
            dst: dst.map(str::to_string),
            timestamp: Utc::now(),
        }
    }

    pub fn hello(src: &str, dst: &str) -> Self {
        Self::new(MessageKind::Hello, src, Some(dst))
    }

    pub fn arp(src: &str, dst: Option<&str>) -> Self {
        Self::new(MessageKind::Arp, src, dst)
    }

    pub fn arp_reply(src: &str, dst: &str) -> Self {
        Self::new(MessageKind::ArpReply, src, Some(dst))
    }

    pub fn is_broadcast(&self) -> bool {
        self.dst.is_none()
    }
}
