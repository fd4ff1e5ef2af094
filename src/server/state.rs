// Shared server state
// Immutable configuration plus the dispatcher every connection task uses

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::Config;
use crate::handler::Dispatcher;

pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
