//! Process-wide paste event source with scoped subscriptions.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use petsight_core::ClipboardItem;
use pipeline_logging::pipeline_debug;

type PasteHandler = Box<dyn Fn(Vec<ClipboardItem>) + Send>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    handlers: Vec<(u64, PasteHandler)>,
}

/// Fan-out point for paste events.
///
/// Handlers stay registered exactly as long as the [`PasteSubscription`]
/// returned by [`PasteEvents::subscribe`] is alive.
#[derive(Clone, Default)]
pub(crate) struct PasteEvents {
    listeners: Arc<Mutex<Listeners>>,
}

impl PasteEvents {
    /// The event source shared by the whole process.
    pub(crate) fn global() -> &'static PasteEvents {
        static GLOBAL: OnceLock<PasteEvents> = OnceLock::new();
        GLOBAL.get_or_init(PasteEvents::default)
    }

    pub(crate) fn subscribe(
        &self,
        handler: impl Fn(Vec<ClipboardItem>) + Send + 'static,
    ) -> PasteSubscription {
        let mut listeners = self.lock();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.handlers.push((id, Box::new(handler)));
        pipeline_debug!("paste listener {} subscribed", id);
        PasteSubscription {
            events: self.clone(),
            id,
        }
    }

    /// Delivers a paste to every live handler; returns how many were notified.
    ///
    /// Handlers run under the listener lock and must not subscribe themselves.
    pub(crate) fn dispatch(&self, items: Vec<ClipboardItem>) -> usize {
        let listeners = self.lock();
        for (_, handler) in &listeners.handlers {
            handler(items.clone());
        }
        listeners.handlers.len()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.lock().handlers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a paste handler registered; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the handler immediately"]
pub(crate) struct PasteSubscription {
    events: PasteEvents,
    id: u64,
}

impl Drop for PasteSubscription {
    fn drop(&mut self) {
        let id = self.id;
        self.events.lock().handlers.retain(|(handler_id, _)| *handler_id != id);
        pipeline_debug!("paste listener {} unsubscribed", id);
    }
}
