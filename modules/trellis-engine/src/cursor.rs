//! Cursors: an immutable state snapshot plus a way to dispatch against it.
//!
//! A cursor never changes. Dispatching returns a new cursor over the state
//! the store holds after the dispatch, and every cursor derived before that
//! dispatch is a stale snapshot. There is no staleness check on dispatch;
//! `version()` is exposed so hosts can detect it themselves.

use std::fmt;
use std::sync::Arc;

use trellis_actions::Action;

use crate::error::DispatchError;
use crate::traits::Store;

/// Knows where a cursor's actions go and how to build the next cursor.
pub trait Navigator<S>: Send + Sync {
    fn dispatch(&self, action: Action) -> Result<Cursor<S>, DispatchError>;
}

pub struct Cursor<S> {
    state: S,
    version: u64,
    navigator: Arc<dyn Navigator<S>>,
}

impl<S: Clone> Clone for Cursor<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            version: self.version,
            navigator: Arc::clone(&self.navigator),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Cursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<S> Cursor<S> {
    pub fn new(state: S, version: u64, navigator: Arc<dyn Navigator<S>>) -> Self {
        Self {
            state,
            version,
            navigator,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Store version this cursor's root snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Dispatch and return a cursor over the resulting state. `self` is
    /// left as it was.
    pub fn dispatch(&self, action: Action) -> Result<Cursor<S>, DispatchError> {
        self.navigator.dispatch(action)
    }

    /// Whether the store has moved on since this cursor was taken.
    pub fn is_stale<R, St: Store<R> + ?Sized>(&self, store: &St) -> bool {
        store.version() != self.version
    }
}

impl<S: 'static> Cursor<S> {
    /// Read the store once. The version is read before the state, so under
    /// concurrent dispatch a snapshot can only look older than it is.
    pub fn snapshot<St>(store: &Arc<St>) -> Self
    where
        St: Store<S> + 'static,
    {
        let version = store.version();
        let state = store.get_state();
        Self::new(
            state,
            version,
            Arc::new(StoreNavigator {
                store: Arc::clone(store),
            }),
        )
    }
}

struct StoreNavigator<St> {
    store: Arc<St>,
}

impl<S: 'static, St: Store<S> + 'static> Navigator<S> for StoreNavigator<St> {
    fn dispatch(&self, action: Action) -> Result<Cursor<S>, DispatchError> {
        self.store.dispatch(action)?;
        Ok(Cursor::snapshot(&self.store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::{Case, Chain};
    use crate::store::MemoryStore;

    fn store() -> Arc<MemoryStore<i64>> {
        let chain = Chain::new(0_i64)
            .chain(Case::new("ADD", |n: i64, by: i64| n + by))
            .unwrap();
        Arc::new(MemoryStore::new(chain.into_transition()).unwrap())
    }

    #[test]
    fn dispatch_returns_a_new_cursor_and_keeps_the_old_one() {
        let store = store();
        let before = Cursor::snapshot(&store);
        let after = before
            .dispatch(Action::new("ADD", serde_json::json!(5)))
            .unwrap();

        assert_eq!(*before.state(), 0);
        assert_eq!(*after.state(), 5);
        assert_eq!(after.version(), before.version() + 1);
    }

    #[test]
    fn staleness_follows_the_store_version() {
        let store = store();
        let cursor = Cursor::snapshot(&store);
        assert!(!cursor.is_stale(&*store));

        store
            .dispatch(Action::new("ADD", serde_json::json!(1)))
            .unwrap();
        assert!(cursor.is_stale(&*store));
        assert!(!Cursor::snapshot(&store).is_stale(&*store));
    }
}
