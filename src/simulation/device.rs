//! Device actor: one worker thread per topology node.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::control::{ActorState, LogSink, StateCell, StopToken};
use super::message::{MessageKind, SimulationMessage};

/// A simulated device.
///
/// The actor announces itself to its neighbors on start, then services its
/// inbox until its stop token fires or the broker goes away.
pub struct DeviceActor {
    name: String,
    neighbors: Vec<String>,
    inbox: Receiver<SimulationMessage>,
    outbound: Sender<SimulationMessage>,
    stop: StopToken,
    state: StateCell,
    log: LogSink,
    poll_interval: Duration,
    arp_requests: bool,
}

impl DeviceActor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        neighbors: Vec<String>,
        inbox: Receiver<SimulationMessage>,
        outbound: Sender<SimulationMessage>,
        stop: StopToken,
        state: StateCell,
        log: LogSink,
        poll_interval: Duration,
        arp_requests: bool,
    ) -> Self {
        Self {
            name,
            neighbors,
            inbox,
            outbound,
            stop,
            state,
            log,
            poll_interval,
            arp_requests,
        }
    }

    /// Worker body. Consumes the actor; the inbox is dropped on return so
    /// later deliveries to this device fail and are discarded by the broker.
    pub fn run(self) {
        self.state.set(ActorState::Running);
        self.log.info(format!("[Sim] Device {} started", self.name));

        self.announce();

        while !self.stop.is_stopped() {
            match self.inbox.recv_timeout(self.poll_interval) {
                Ok(msg) => self.handle(msg),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("{}: inbox closed", self.name);
                    break;
                }
            }
        }

        self.state.set(ActorState::Stopped);
        self.log.info(format!("[Sim] Device {} stopped", self.name));
    }

    fn announce(&self) {
        for neighbor in &self.neighbors {
            if self.send(SimulationMessage::hello(&self.name, neighbor)) {
                self.log.info(format!("[{}] sent HELLO to {}", self.name, neighbor));
            }
        }

        if !self.arp_requests {
            return;
        }
        for neighbor in &self.neighbors {
            if self.send(SimulationMessage::arp(&self.name, Some(neighbor))) {
                self.log.info(format!("[{}] sent ARP to {}", self.name, neighbor));
            }
        }
        if !self.neighbors.is_empty() && self.send(SimulationMessage::arp(&self.name, None)) {
            self.log.info(format!("[{}] broadcast ARP", self.name));
        }
    }

    fn handle(&self, msg: SimulationMessage) {
        self.log.info(format!("[{}] received {} from {}", self.name, msg.kind, msg.src));

        // Only a directed ARP request is answered
        if msg.kind == MessageKind::Arp && msg.dst.as_deref() == Some(self.name.as_str()) {
            if self.send(SimulationMessage::arp_reply(&self.name, &msg.src)) {
                self.log.info(format!("[{}] sent ARP_REPLY to {}", self.name, msg.src));
            }
        }
    }

    fn send(&self, msg: SimulationMessage) -> bool {
        match self.outbound.send(msg) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("{}: broker unavailable, dropping {}", self.name, e.0.kind);
                false
            }
        }
    }
}
