//! Store implementations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, warn};
use trellis_actions::Action;

use crate::config::Config;
use crate::error::DispatchError;
use crate::reducer::Transition;
use crate::traits::{Listener, Store};

/// Kind of the action a `MemoryStore` reduces once at construction to seed
/// its state. No reducer should register a case for it.
pub const INIT_KIND: &str = "@@trellis/INIT";

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle returned by `Store::subscribe`. Dropping it keeps the listener
/// registered; call `unsubscribe` to remove it.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

type Listeners = Mutex<Vec<(u64, Listener)>>;

/// In-memory store: one owned state cell, a version counter, and a listener
/// list. Thread-safe; dispatches are serialized on the state lock.
pub struct MemoryStore<S> {
    name: String,
    transition: Transition<S>,
    state: Mutex<S>,
    version: AtomicU64,
    listeners: Arc<Listeners>,
    next_listener: AtomicU64,
}

impl<S: Clone + Send + Sync + 'static> MemoryStore<S> {
    /// Create a store, seeding state by reducing `INIT_KIND` from nothing.
    pub fn new(transition: Transition<S>) -> Result<Self, DispatchError> {
        Self::with_config(transition, &Config::default())
    }

    pub fn with_config(transition: Transition<S>, config: &Config) -> Result<Self, DispatchError> {
        let initial = transition(None, &Action::bare(INIT_KIND))?;
        Ok(Self {
            name: config.store_name.clone(),
            transition,
            state: Mutex::new(initial),
            version: AtomicU64::new(0),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(1),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered listeners (for test assertions).
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    fn notify(&self) {
        // Cloned so listeners may subscribe, unsubscribe or dispatch.
        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl<S: Clone + Send + Sync + 'static> Store<S> for MemoryStore<S> {
    fn get_state(&self) -> S {
        lock(&self.state).clone()
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn dispatch(&self, action: Action) -> Result<Action, DispatchError> {
        let version = {
            let mut state = lock(&self.state);
            let next = match (self.transition)(Some(state.clone()), &action) {
                Ok(next) => next,
                Err(e) => {
                    warn!(
                        store = %self.name,
                        kind = %action.kind,
                        error = %e,
                        "Transition failed, state unchanged"
                    );
                    return Err(e);
                }
            };
            *state = next;
            self.version.fetch_add(1, Ordering::SeqCst) + 1
        };

        debug!(store = %self.name, kind = %action.kind, version, "Dispatched action");
        self.notify();
        Ok(action)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, listener));

        let listeners: Weak<Listeners> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                lock(&listeners).retain(|(other, _)| *other != id);
            }
        })
    }
}

/// State is only replaced after a successful transition, so a poisoned lock
/// still guards a consistent value.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
