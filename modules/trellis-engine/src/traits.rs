//! Core traits for the reducer engine.

use std::sync::Arc;

use trellis_actions::Action;

use crate::error::DispatchError;
use crate::store::Subscription;

/// Pure state transitions. No I/O, no side effects.
///
/// `Chain` is the usual implementation; a hand-written `match` on
/// `action.kind` works just as well when the cases are known up front.
/// Collections and references take any `Reducer` as their inner reducer.
pub trait Reducer<S>: Send + Sync {
    /// The state used before anything has been reduced.
    fn empty(&self) -> S;

    fn reduce(&self, state: S, action: &Action) -> Result<S, DispatchError>;
}

impl<S, R: Reducer<S> + ?Sized> Reducer<S> for Arc<R> {
    fn empty(&self) -> S {
        (**self).empty()
    }

    fn reduce(&self, state: S, action: &Action) -> Result<S, DispatchError> {
        (**self).reduce(state, action)
    }
}

/// Callback invoked after every successful dispatch.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// The external store the cursors sit on top of.
///
/// Implemented by `MemoryStore`; hosts with their own state container
/// implement it to get cursors over their state.
pub trait Store<S>: Send + Sync {
    /// Current state. No side effects.
    fn get_state(&self) -> S;

    /// Incremented once per successful dispatch.
    fn version(&self) -> u64;

    /// Apply the transition, install the new state, notify subscribers, and
    /// hand the action back unchanged.
    fn dispatch(&self, action: Action) -> Result<Action, DispatchError>;

    fn subscribe(&self, listener: Listener) -> Subscription;
}

impl<S, St: Store<S> + ?Sized> Store<S> for Arc<St> {
    fn get_state(&self) -> S {
        (**self).get_state()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }

    fn dispatch(&self, action: Action) -> Result<Action, DispatchError> {
        (**self).dispatch(action)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        (**self).subscribe(listener)
    }
}
