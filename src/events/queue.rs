//! # Event Queue
//!
//! Pending events plus the listeners they are delivered to. The queue is
//! owned by [`AppContext`]; commands fire into it and drain it with
//! [`process_events`] once their own work is done.

use std::rc::Rc;

use super::types::{Event, EventKind};
use crate::context::AppContext;
use crate::error::Result;

/// Reacts to one kind of event.
pub trait Listener {
    fn name(&self) -> &'static str;

    fn kind(&self) -> EventKind;

    fn is_target(&self, event: &Event) -> bool {
        event.kind() == self.kind()
    }

    fn process_event(&self, event: &Event, ctx: &mut AppContext) -> Result<()>;
}

#[derive(Default)]
pub struct EventQueue {
    pending: Vec<Event>,
    listeners: Vec<Rc<dyn Listener>>,
    draining: bool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&mut self, event: Event) {
        tracing::debug!("Event fired: {event}");
        self.pending.push(event);
    }

    /// Listeners receive events in registration order.
    pub fn register(&mut self, listener: Rc<dyn Listener>) {
        tracing::debug!("Listener registered: {}", listener.name());
        self.listeners.push(listener);
    }

    pub fn pending(&self) -> &[Event] {
        &self.pending
    }

    pub fn listener_names(&self) -> Vec<&'static str> {
        self.listeners.iter().map(|l| l.name()).collect()
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }
}

/// Deliver every pending event to its listeners.
///
/// The whole batch is taken out of the queue before delivery starts, so
/// events fired by listeners wait for the next drain. Calling this while a
/// drain is running does nothing. A failing listener is logged and reported
/// and the remaining deliveries still happen.
pub fn process_events(ctx: &mut AppContext) {
    if ctx.events.draining {
        tracing::debug!("Event drain already running, skipping nested drain");
        return;
    }
    let batch = std::mem::take(&mut ctx.events.pending);
    if batch.is_empty() {
        return;
    }
    let listeners = ctx.events.listeners.clone();
    ctx.events.draining = true;

    for event in &batch {
        for listener in listeners.iter().filter(|l| l.is_target(event)) {
            tracing::debug!("Delivering {event} to {}", listener.name());
            if let Err(e) = listener.process_event(event, ctx) {
                tracing::warn!("Listener {} failed on {event}: {e}", listener.name());
                ctx.editor.echo_error(&e.report());
            }
        }
    }

    ctx.events.draining = false;
}
