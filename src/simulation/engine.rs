//! Day-1 simulation driver.
//!
//! Spawns one worker per device plus a broker, lets them exchange
//! HELLO/ARP traffic for a fixed wall-clock duration, then stops and joins
//! every worker before returning the collected log.

use std::collections::HashMap;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Sender};
use serde::{Deserialize, Serialize};

use crate::topology::TopologyGraph;

use super::broker::Broker;
use super::control::{ActorState, LogSink, StateCell, StopToken};
use super::device::DeviceActor;
use super::message::SimulationMessage;

/// Default wall-clock length of a Day-1 run
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Default interval at which workers re-check their stop token
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("failed to spawn worker for {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Also send ARP requests to each neighbor at startup
    pub arp_requests: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            poll_interval: DEFAULT_POLL_INTERVAL,
            arp_requests: false,
        }
    }
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub log: Vec<String>,
    /// Final state of every device, in topology order
    pub states: Vec<(String, ActorState)>,
}

impl SimulationRun {
    pub fn text(&self) -> String {
        self.log.join("\n")
    }
}

struct Worker {
    name: String,
    stop: StopToken,
    state: StateCell,
    handle: Option<JoinHandle<()>>,
}

/// A running simulation.
///
/// Dropping it without calling [`Simulation::shutdown`] still raises the
/// stop token so no worker outlives the handle for long.
pub struct Simulation {
    stop: StopToken,
    log: LogSink,
    workers: Vec<Worker>,
    broker: Option<JoinHandle<()>>,
    injector: Option<Sender<SimulationMessage>>,
}

impl Simulation {
    /// Spawn the broker and one worker per device
    pub fn start(graph: &TopologyGraph, options: &SimulationOptions) -> Result<Self, SimulationError> {
        let stop = StopToken::new();
        let log = LogSink::new();
        let (outbound_tx, outbound_rx) = unbounded();

        let mut inboxes = HashMap::new();
        let mut receivers = Vec::new();
        let mut neighbors = HashMap::new();
        for name in graph.hostnames() {
            let (tx, rx) = unbounded();
            inboxes.insert(name.to_string(), tx);
            receivers.push((name.to_string(), rx));
            let adjacent: Vec<String> = graph.neighbors(name).into_iter().map(str::to_string).collect();
            neighbors.insert(name.to_string(), adjacent);
        }

        log.info(format!(
            "[Sim] Starting Day-1 simulation: {} devices for {:?}",
            receivers.len(),
            options.duration
        ));

        let mut sim = Self {
            stop: stop.clone(),
            log: log.clone(),
            workers: Vec::with_capacity(receivers.len()),
            broker: None,
            injector: Some(outbound_tx.clone()),
        };

        let broker = Broker::new(
            outbound_rx,
            inboxes,
            neighbors.clone(),
            stop.clone(),
            log.clone(),
            options.poll_interval,
        );
        let handle = thread::Builder::new()
            .name("netsim-broker".into())
            .spawn(move || broker.run())
            .map_err(|source| SimulationError::Spawn {
                name: "broker".into(),
                source,
            })?;
        sim.broker = Some(handle);

        for (name, inbox) in receivers {
            let actor_stop = stop.child();
            let state = StateCell::new();
            let actor = DeviceActor::new(
                name.clone(),
                neighbors.remove(&name).unwrap_or_default(),
                inbox,
                outbound_tx.clone(),
                actor_stop.clone(),
                state.clone(),
                log.clone(),
                options.poll_interval,
                options.arp_requests,
            );

            let spawned = thread::Builder::new()
                .name(format!("netsim-{}", name))
                .spawn(move || actor.run());
            match spawned {
                Ok(handle) => sim.workers.push(Worker {
                    name,
                    stop: actor_stop,
                    state,
                    handle: Some(handle),
                }),
                Err(source) => {
                    // Already-spawned workers are joined by the drop of `sim`
                    return Err(SimulationError::Spawn { name, source });
                }
            }
        }

        Ok(sim)
    }

    /// Stop a single device. Returns false for an unknown name.
    pub fn stop_device(&self, name: &str) -> bool {
        match self.workers.iter().find(|w| w.name == name) {
            Some(worker) => {
                worker.stop.stop();
                true
            }
            None => false,
        }
    }

    /// Queue a message as if a device had sent it
    pub fn inject(&self, msg: SimulationMessage) -> bool {
        self.injector.as_ref().is_some_and(|tx| tx.send(msg).is_ok())
    }

    /// Current state of every device
    pub fn states(&self) -> Vec<(String, ActorState)> {
        self.workers.iter().map(|w| (w.name.clone(), w.state.get())).collect()
    }

    /// Log lines recorded so far
    pub fn log_snapshot(&self) -> Vec<String> {
        self.log.snapshot()
    }

    /// Stop every worker, wait for all of them and return the log
    pub fn shutdown(mut self) -> SimulationRun {
        self.stop_and_join();
        self.log.info("[Sim] Simulation ended");
        SimulationRun {
            log: self.log.snapshot(),
            states: self.states(),
        }
    }

    fn stop_and_join(&mut self) {
        self.stop.stop();
        self.injector = None;

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    log::error!("Worker for {} panicked", worker.name);
                }
            }
        }
        if let Some(handle) = self.broker.take() {
            if handle.join().is_err() {
                log::error!("Broker worker panicked");
            }
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Run a full simulation for `options.duration` and return its log
pub fn run_simulation(graph: &TopologyGraph, options: &SimulationOptions) -> Result<SimulationRun, SimulationError> {
    let sim = Simulation::start(graph, options)?;
    thread::sleep(options.duration);
    Ok(sim.shutdown())
}

/// Day-1 bring-up: every device announces itself to its neighbors
pub fn run_day1_simulation(graph: &TopologyGraph, duration: Duration) -> Result<SimulationRun, SimulationError> {
    let options = SimulationOptions {
        duration,
        ..SimulationOptions::default()
    };
    run_simulation(graph, &options)
}
