//! Binds host events to handlers, one handler per event name.

pub mod handlers;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{HostLogError, Result};
use crate::log::LogSink;
use crate::model::HostEvent;

pub use handlers::{format_event, record_event};

pub type Handler = Arc<dyn Fn(&HostEvent, &dyn LogSink) + Send + Sync>;

pub struct Subscriber {
    sink: Arc<dyn LogSink>,
    handlers: HashMap<&'static str, Handler>,
}

impl Subscriber {
    /// A subscriber with no handlers; every event is ignored until bound.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            handlers: HashMap::new(),
        }
    }

    /// Binds [`record_event`] to every event in the catalog.
    pub fn with_default_handlers(sink: Arc<dyn LogSink>) -> Result<Self> {
        let mut subscriber = Self::new(sink);
        for name in HostEvent::NAMES {
            subscriber.on(name, record_event)?;
        }
        Ok(subscriber)
    }

    /// Registers the handler for `name`. Fails if the name is not a host
    /// event or already has a handler; the existing one is kept.
    pub fn on<F>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&HostEvent, &dyn LogSink) + Send + Sync + 'static,
    {
        let name = HostEvent::NAMES
            .iter()
            .copied()
            .find(|n| *n == name)
            .ok_or_else(|| HostLogError::UnknownEvent(name.to_string()))?;

        match self.handlers.entry(name) {
            Entry::Occupied(_) => {
                warn!("Refusing second handler for {}", name);
                Err(HostLogError::DuplicateHandler(name.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered event names, sorted.
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Runs the handler bound to the event's name. A panicking handler only
    /// loses its own event.
    pub fn dispatch(&self, event: &HostEvent) {
        let name = event.name();
        let Some(handler) = self.handlers.get(name) else {
            debug!("No handler registered for {}", name);
            return;
        };
        debug!("Dispatching {}", name);
        if catch_unwind(AssertUnwindSafe(|| handler(event, self.sink.as_ref()))).is_err() {
            warn!("Handler for {} panicked", name);
        }
    }
}
