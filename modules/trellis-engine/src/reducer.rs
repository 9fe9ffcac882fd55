//! The reducer combinator.
//!
//! A `Chain` is a linked list of `Case`s, newest first, ending in a
//! pass-through that returns state unchanged. Every chaining operation
//! returns a new `Chain` that shares the older links; nothing is mutated.

use std::fmt;
use std::sync::Arc;

use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, trace, warn};
use trellis_actions::Action;

use crate::config::{Config, UnhandledPolicy};
use crate::error::{ConfigError, DispatchError};
use crate::store::INIT_KIND;
use crate::traits::Reducer;

type Handler<S> = Arc<dyn Fn(S, &serde_json::Value) -> Result<S, DispatchError> + Send + Sync>;

/// The store-facing transition function. `None` means "no state yet" and
/// seeds from the reducer's empty value.
pub type Transition<S> =
    Arc<dyn Fn(Option<S>, &Action) -> Result<S, DispatchError> + Send + Sync>;

/// One tag's handling rule.
pub struct Case<S> {
    kind: String,
    handler: Handler<S>,
}

impl<S> Clone for Case<S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> fmt::Debug for Case<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case").field("kind", &self.kind).finish()
    }
}

impl<S: 'static> Case<S> {
    /// A case whose payload decodes to `P`. Use `()` for actions without a
    /// payload.
    pub fn new<P, F>(kind: impl Into<String>, reduce: F) -> Self
    where
        P: DeserializeOwned,
        F: Fn(S, P) -> S + Send + Sync + 'static,
    {
        Self::try_new(kind, move |state, payload: P| Ok(reduce(state, payload)))
    }

    /// Like `new`, but the handler may fail. Its error is returned to the
    /// dispatcher and the state is left as it was.
    pub fn try_new<P, F>(kind: impl Into<String>, reduce: F) -> Self
    where
        P: DeserializeOwned,
        F: Fn(S, P) -> anyhow::Result<S> + Send + Sync + 'static,
    {
        let kind = kind.into();
        let tag = kind.clone();
        Self::typed(kind, move |state, payload: P| {
            reduce(state, payload).map_err(|source| DispatchError::Handler {
                kind: tag.clone(),
                source,
            })
        })
    }

    /// A case that ignores the payload entirely.
    pub fn unit<F>(kind: impl Into<String>, reduce: F) -> Self
    where
        F: Fn(S) -> S + Send + Sync + 'static,
    {
        Self::typed(kind, move |state, _: IgnoredAny| Ok(reduce(state)))
    }

    /// Decode the payload to `P` and hand it to a handler that reports its
    /// own `DispatchError`s. The collection and reference cases use this
    /// directly so inner-reducer errors surface unwrapped.
    pub(crate) fn typed<P, F>(kind: impl Into<String>, reduce: F) -> Self
    where
        P: DeserializeOwned,
        F: Fn(S, P) -> Result<S, DispatchError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        let tag = kind.clone();
        let handler: Handler<S> = Arc::new(move |state: S, payload: &serde_json::Value| {
            let payload = <P as serde::Deserialize>::deserialize(payload).map_err(|source| {
                DispatchError::Payload {
                    kind: tag.clone(),
                    source,
                }
            })?;
            reduce(state, payload)
        });
        Self { kind, handler }
    }
}

impl<S> Case<S> {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn apply(&self, state: S, payload: &serde_json::Value) -> Result<S, DispatchError> {
        (self.handler)(state, payload)
    }
}

struct Link<S> {
    case: Case<S>,
    next: Option<Arc<Link<S>>>,
}

/// Immutable reducer built by chaining cases.
pub struct Chain<S> {
    empty: S,
    head: Option<Arc<Link<S>>>,
    unhandled: UnhandledPolicy,
}

impl<S: Clone> Clone for Chain<S> {
    fn clone(&self) -> Self {
        Self {
            empty: self.empty.clone(),
            head: self.head.clone(),
            unhandled: self.unhandled,
        }
    }
}

impl<S> fmt::Debug for Chain<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("kinds", &self.kinds())
            .field("unhandled", &self.unhandled)
            .finish()
    }
}

impl<S> Chain<S> {
    /// Tags handled by this chain, newest registration first. Shadowed
    /// duplicates appear once per registration.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds = Vec::new();
        let mut link = self.head.as_deref();
        while let Some(l) = link {
            kinds.push(l.case.kind());
            link = l.next.as_deref();
        }
        kinds
    }

    pub fn handles(&self, kind: &str) -> bool {
        self.find(kind).is_some()
    }

    fn find(&self, kind: &str) -> Option<&Case<S>> {
        let mut link = self.head.as_deref();
        while let Some(l) = link {
            if l.case.kind == kind {
                return Some(&l.case);
            }
            link = l.next.as_deref();
        }
        None
    }

    fn report_unhandled(&self, action: &Action) {
        // Store seeding is expected to fall through every case.
        if action.is(INIT_KIND) {
            return;
        }
        match self.unhandled {
            UnhandledPolicy::Ignore => {}
            UnhandledPolicy::Trace => {
                trace!(kind = %action.kind, "Unhandled action, state unchanged")
            }
            UnhandledPolicy::Warn => {
                warn!(kind = %action.kind, "Unhandled action, state unchanged")
            }
        }
    }
}

impl<S: Clone + Send + Sync + 'static> Chain<S> {
    /// The zero-case chain: every action passes through.
    pub fn new(empty: S) -> Self {
        Self {
            empty,
            head: None,
            unhandled: UnhandledPolicy::default(),
        }
    }

    pub fn with_config(empty: S, config: &Config) -> Self {
        Self::new(empty).on_unhandled(config.unhandled)
    }

    pub fn on_unhandled(mut self, policy: UnhandledPolicy) -> Self {
        self.unhandled = policy;
        self
    }

    /// Register a case. Fails if its tag is already handled.
    pub fn chain(&self, case: Case<S>) -> Result<Self, ConfigError> {
        if self.handles(case.kind()) {
            return Err(ConfigError::DuplicateKind(case.kind));
        }
        Ok(self.link(case))
    }

    /// Register a case that replaces any earlier case with the same tag.
    pub fn shadow(&self, case: Case<S>) -> Self {
        if self.handles(case.kind()) {
            debug!(kind = %case.kind, "Shadowing earlier case");
        }
        self.link(case)
    }

    fn link(&self, case: Case<S>) -> Self {
        Self {
            empty: self.empty.clone(),
            head: Some(Arc::new(Link {
                case,
                next: self.head.clone(),
            })),
            unhandled: self.unhandled,
        }
    }

    /// Reduce, seeding from `empty` when there is no state yet.
    pub fn reduce_or_init(&self, state: Option<S>, action: &Action) -> Result<S, DispatchError> {
        let state = state.unwrap_or_else(|| self.empty.clone());
        self.reduce(state, action)
    }

    /// Hand the chain to a store.
    pub fn into_transition(self) -> Transition<S> {
        Arc::new(move |state: Option<S>, action: &Action| {
            self.reduce_or_init(state, action)
        })
    }
}

impl<S: Clone + Send + Sync + 'static> Reducer<S> for Chain<S> {
    fn empty(&self) -> S {
        self.empty.clone()
    }

    fn reduce(&self, state: S, action: &Action) -> Result<S, DispatchError> {
        match self.find(&action.kind) {
            Some(case) => case.apply(state, &action.payload),
            None => {
                self.report_unhandled(action);
                Ok(state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_case_chain_passes_through() {
        let chain = Chain::new(7_i32);
        assert_eq!(chain.reduce(3, &Action::bare("ANY")).unwrap(), 3);
        assert_eq!(chain.reduce_or_init(None, &Action::bare("ANY")).unwrap(), 7);
    }

    #[test]
    fn chaining_leaves_the_previous_chain_untouched() {
        let base = Chain::new(0_i32);
        let incr = base.chain(Case::unit("INCR", |n: i32| n + 1)).unwrap();

        assert_eq!(base.reduce(0, &Action::bare("INCR")).unwrap(), 0);
        assert_eq!(incr.reduce(0, &Action::bare("INCR")).unwrap(), 1);
        assert!(base.kinds().is_empty());
    }

    #[test]
    fn kinds_are_listed_newest_first() {
        let chain = Chain::new(0_i32)
            .chain(Case::unit("A", |n: i32| n))
            .unwrap()
            .chain(Case::unit("B", |n: i32| n))
            .unwrap();
        assert_eq!(chain.kinds(), vec!["B", "A"]);
    }

    #[test]
    fn payload_mismatch_names_the_case() {
        let chain = Chain::new(0_i32)
            .chain(Case::new("ADD", |n: i32, by: i32| n + by))
            .unwrap();
        let err = chain
            .reduce(0, &Action::new("ADD", json!("three")))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Payload { ref kind, .. } if kind == "ADD"));
    }

    #[test]
    fn handler_error_propagates() {
        let chain = Chain::new(0_i32)
            .chain(Case::try_new("DIV", |n: i32, by: i32| {
                n.checked_div(by)
                    .ok_or_else(|| anyhow::anyhow!("division by zero"))
            }))
            .unwrap();
        assert_eq!(chain.reduce(10, &Action::new("DIV", json!(2))).unwrap(), 5);
        let err = chain.reduce(10, &Action::new("DIV", json!(0))).unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }
}
