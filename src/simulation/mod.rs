//! Concurrent Day-1 bring-up and link-failure simulation.
//!
//! One worker thread per device plus a broker thread, wired together with
//! `crossbeam-channel` queues. Every run builds its own stop token and log
//! sink, so independent runs never share state.

pub mod broker;
pub mod control;
pub mod device;
pub mod engine;
pub mod failure;
pub mod message;

pub use control::{ActorState, LogSink, StopToken};
pub use engine::{
    run_day1_simulation, run_simulation, Simulation, SimulationError, SimulationOptions, SimulationRun,
};
pub use failure::{fail_link, parse_link_key, LinkFailureOutcome};
pub use message::{MessageKind, SimulationMessage};
