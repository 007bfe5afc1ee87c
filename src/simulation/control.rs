//! Per-run shared state: the stop token, actor state cells and the log sink.
//!
//! All of these are created fresh for each simulation run and handed to
//! workers when they are spawned.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Cooperative cancellation flag.
///
/// A child token observes its own flag and its parent's, so stopping the
/// run stops every actor while a single actor can still be stopped alone.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    own: Arc<AtomicBool>,
    parent: Option<Arc<AtomicBool>>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token stopped by either itself or `self`
    pub fn child(&self) -> Self {
        Self {
            own: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::clone(&self.own)),
        }
    }

    pub fn stop(&self) {
        self.own.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.own.load(Ordering::SeqCst)
            || self
                .parent
                .as_ref()
                .is_some_and(|p| p.load(Ordering::SeqCst))
    }
}

/// Lifecycle of a device actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Created,
    Running,
    Stopped,
}

impl ActorState {
    fn to_u8(self) -> u8 {
        match self {
            ActorState::Created => 0,
            ActorState::Running => 1,
            ActorState::Stopped => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ActorState::Created,
            1 => ActorState::Running,
            _ => ActorState::Stopped,
        }
    }
}

/// State published by an actor; written only by the actor itself
#[derive(Debug, Clone)]
pub struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ActorState::Created.to_u8())))
    }

    pub fn get(&self) -> ActorState {
        ActorState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub(crate) fn set(&self, state: ActorState) {
        self.0.store(state.to_u8(), Ordering::SeqCst);
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only collector for simulation log lines.
///
/// Every line is also forwarded to the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, level: log::Level, line: impl Into<String>) {
        let line = line.into();
        log::log!(target: "netsim::simulation", level, "{}", line);
        self.lines.lock().push(line);
    }

    pub fn info(&self, line: impl Into<String>) {
        self.record(log::Level::Info, line);
    }

    pub fn warn(&self, line: impl Into<String>) {
        self.record(log::Level::Warn, line);
    }

    pub fn error(&self, line: impl Into<String>) {
        self.record(log::Level::Error, line);
    }

    /// Copy of the lines recorded so far
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_token_follows_parent() {
        let run = StopToken::new();
        let a = run.child();
        let b = run.child();

        a.stop();
        assert!(a.is_stopped());
        assert!(!b.is_stopped());
        assert!(!run.is_stopped());

        run.stop();
        assert!(b.is_stopped());
    }

    #[test]
    fn test_state_cell() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ActorState::Created);
        let observer = cell.clone();
        cell.set(ActorState::Running);
        assert_eq!(observer.get(), ActorState::Running);
        cell.set(ActorState::Stopped);
        assert_eq!(observer.get(), ActorState::Stopped);
    }

    #[test]
    fn test_log_sink_is_shared() {
        let sink = LogSink::new();
        let clone = sink.clone();
        sink.info("one");
        clone.warn("two");
        assert_eq!(sink.snapshot(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(clone.len(), 2);
    }
}
