//! Message broker: drains the shared outbound queue and routes to inboxes.

use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::control::{LogSink, StopToken};
use super::message::SimulationMessage;

pub struct Broker {
    inbound: Receiver<SimulationMessage>,
    inboxes: HashMap<String, Sender<SimulationMessage>>,
    neighbors: HashMap<String, Vec<String>>,
    stop: StopToken,
    log: LogSink,
    poll_interval: Duration,
}

impl Broker {
    pub(crate) fn new(
        inbound: Receiver<SimulationMessage>,
        inboxes: HashMap<String, Sender<SimulationMessage>>,
        neighbors: HashMap<String, Vec<String>>,
        stop: StopToken,
        log: LogSink,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inbound,
            inboxes,
            neighbors,
            stop,
            log,
            poll_interval,
        }
    }

    pub fn run(self) {
        log::debug!("Broker routing for {} devices", self.inboxes.len());

        while !self.stop.is_stopped() {
            match self.inbound.recv_timeout(self.poll_interval) {
                Ok(msg) => self.route(msg),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log::debug!("Broker stopped");
    }

    fn route(&self, msg: SimulationMessage) {
        if msg.is_broadcast() {
            self.broadcast(msg);
            return;
        }

        let dst = msg.dst.clone().unwrap_or_default();
        if self.inboxes.contains_key(&dst) {
            self.deliver(&dst, msg);
        } else {
            self.log.warn(format!(
                "[Broker] dropped {} from {}: unknown destination {}",
                msg.kind, msg.src, dst
            ));
        }
    }

    /// Fan a broadcast out to the sender's neighbors
    fn broadcast(&self, msg: SimulationMessage) {
        let targets = self.neighbors.get(&msg.src).map(Vec::as_slice).unwrap_or(&[]);
        self.log.info(format!(
            "[Broker] broadcast {} from {} to {} neighbors",
            msg.kind,
            msg.src,
            targets.len()
        ));
        for target in targets {
            self.deliver(target, msg.clone());
        }
    }

    fn deliver(&self, dst: &str, msg: SimulationMessage) {
        let Some(inbox) = self.inboxes.get(dst) else {
            return;
        };
        let (kind, src) = (msg.kind, msg.src.clone());
        // A stopped device has dropped its inbox
        if inbox.send(msg).is_err() {
            log::debug!("Discarding {} from {} for stopped device {}", kind, src, dst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::message::MessageKind;
    use crossbeam_channel::unbounded;
    use std::thread;

    fn inbox_map(names: &[&str]) -> (HashMap<String, Sender<SimulationMessage>>, HashMap<String, Receiver<SimulationMessage>>) {
        let mut senders = HashMap::new();
        let mut receivers = HashMap::new();
        for name in names {
            let (tx, rx) = unbounded();
            senders.insert(name.to_string(), tx);
            receivers.insert(name.to_string(), rx);
        }
        (senders, receivers)
    }

    #[test]
    fn test_routing() {
        let (senders, mut receivers) = inbox_map(&["A", "B", "C"]);
        let mut neighbors = HashMap::new();
        neighbors.insert("A".to_string(), vec!["B".to_string(), "C".to_string()]);

        let (in_tx, in_rx) = unbounded();
        let stop = StopToken::new();
        let log = LogSink::new();
        let broker = Broker::new(in_rx, senders, neighbors, stop.clone(), log.clone(), Duration::from_millis(10));
        let handle = thread::spawn(move || broker.run());

        in_tx.send(SimulationMessage::hello("A", "B")).unwrap();
        in_tx.send(SimulationMessage::hello("A", "Z")).unwrap();
        in_tx.send(SimulationMessage::arp("A", None)).unwrap();

        let b = receivers.remove("B").unwrap();
        let c = receivers.remove("C").unwrap();
        let first = b.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.kind, MessageKind::Hello);
        let second = b.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(second.kind, MessageKind::Arp);
        assert_eq!(c.recv_timeout(Duration::from_secs(2)).unwrap().kind, MessageKind::Arp);
        assert!(receivers["A"].try_recv().is_err());

        stop.stop();
        handle.join().unwrap();

        let lines = log.snapshot();
        assert!(lines.iter().any(|l| l.contains("unknown destination Z")));
        assert!(lines.contains(&"[Broker] broadcast ARP from A to 2 neighbors".to_string()));
    }

    #[test]
    fn test_delivery_to_stopped_device_is_discarded() {
        let (senders, mut receivers) = inbox_map(&["A"]);
        drop(receivers.remove("A"));

        let (in_tx, in_rx) = unbounded();
        let stop = StopToken::new();
        let broker = Broker::new(in_rx, senders, HashMap::new(), stop.clone(), LogSink::new(), Duration::from_millis(10));
        let handle = thread::spawn(move || broker.run());

        in_tx.send(SimulationMessage::hello("B", "A")).unwrap();
        thread::sleep(Duration::from_millis(50));
        stop.stop();
        handle.join().unwrap();
    }
}
