//! Synchronous event dispatch from a runner to one listener.
//!
//! The publisher is a table from [`EventKind`] to handler functions. A
//! listener fills the table once, when its [`EventBus`] is built, and every
//! published event is then handed to the matching handlers in registration
//! order before [`EventBus::publish`] returns.

use std::collections::HashMap;

use crate::event::{Event, EventKind, TestEvent};

type Handler<L> = Box<dyn Fn(&mut L, &TestEvent) -> Result<(), <L as EventListener>::Error>>;

/// A component that reacts to lifecycle events.
pub trait EventListener: Sized {
    /// Error returned by the listener's handlers.
    type Error;

    /// Register one handler per event kind the listener cares about.
    fn set_event_publisher(&self, publisher: &mut EventPublisher<Self>);
}

/// Table of handlers keyed by event kind.
pub struct EventPublisher<L: EventListener> {
    handlers: HashMap<EventKind, Vec<Handler<L>>>,
}

impl<L: EventListener + 'static> EventPublisher<L> {
    /// Register `handler` for events of type `E`.
    ///
    /// # Examples
    /// ```
    /// use spark_bridge::event::{EventKind, RunStarted};
    /// use spark_bridge::{EventBus, EventListener, EventPublisher};
    ///
    /// #[derive(Default)]
    /// struct Counter(u32);
    ///
    /// impl Counter {
    ///     fn run_started(&mut self, _event: &RunStarted) -> Result<(), String> {
    ///         self.0 += 1;
    ///         Ok(())
    ///     }
    /// }
    ///
    /// impl EventListener for Counter {
    ///     type Error = String;
    ///
    ///     fn set_event_publisher(&self, publisher: &mut EventPublisher<Self>) {
    ///         publisher.register_handler_for::<RunStarted>(Self::run_started);
    ///     }
    /// }
    ///
    /// let mut bus = EventBus::new(Counter::default());
    /// assert_eq!(bus.handler_count(EventKind::RunStarted), 1);
    /// bus.publish(RunStarted::now()).unwrap();
    /// assert_eq!(bus.listener().0, 1);
    /// ```
    pub fn register_handler_for<E: Event + 'static>(
        &mut self,
        handler: fn(&mut L, &E) -> Result<(), L::Error>,
    ) {
        let dispatch: Handler<L> = Box::new(move |listener: &mut L, event: &TestEvent| {
            match E::from_event(event) {
                Some(concrete) => handler(listener, concrete),
                None => Ok(()),
            }
        });
        self.handlers.entry(E::KIND).or_default().push(dispatch);
    }
}

impl<L: EventListener> EventPublisher<L> {
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    fn dispatch(&self, listener: &mut L, event: &TestEvent) -> Result<(), L::Error> {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            log::trace!("no handler registered for {}", event.kind());
            return Ok(());
        };
        for handler in handlers {
            handler(listener, event)?;
        }
        Ok(())
    }
}

/// A listener together with the handlers it registered.
///
/// Building the bus runs the listener's registration, so no event can reach
/// the listener before its handler table is complete.
pub struct EventBus<L: EventListener> {
    listener: L,
    publisher: EventPublisher<L>,
}

impl<L: EventListener> EventBus<L> {
    /// Wrap `listener` and let it register its handlers.
    #[must_use]
    pub fn new(listener: L) -> Self {
        let mut publisher = EventPublisher::new();
        listener.set_event_publisher(&mut publisher);
        Self {
            listener,
            publisher,
        }
    }

    /// Deliver `event` to every handler registered for its kind.
    ///
    /// # Errors
    /// Returns the first error raised by a handler; later handlers for the
    /// same event do not run.
    pub fn publish(&mut self, event: impl Into<TestEvent>) -> Result<(), L::Error> {
        let event = event.into();
        log::debug!("publishing {}", event.kind());
        self.publisher.dispatch(&mut self.listener, &event)
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.publisher.handler_count(kind)
    }

    /// Borrow the listener.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Unwrap the listener.
    #[must_use]
    pub fn into_listener(self) -> L {
        self.listener
    }
}
