//! A single nested sub-state, reached without a key.

use std::sync::Arc;

use trellis_actions::{Action, ActionError};

use crate::cursor::Cursor;
use crate::error::DispatchError;
use crate::field::Field;
use crate::navigate::{item, Item};
use crate::reducer::Case;
use crate::traits::Reducer;

/// Routes actions of one kind to an inner reducer over one field of `S`.
///
/// The payload of the outer action is the inner action itself. There is no
/// add or remove: the field always exists and starts at whatever the owner's
/// empty state holds.
pub struct Reference<S, I> {
    kind: String,
    inner: Arc<dyn Reducer<I>>,
    field: Field<S, I>,
}

impl<S, I> Clone for Reference<S, I> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            inner: Arc::clone(&self.inner),
            field: self.field.clone(),
        }
    }
}

impl<S, I> Reference<S, I>
where
    S: Clone + Send + Sync + 'static,
    I: Clone + 'static,
{
    pub fn new(
        kind: impl Into<String>,
        inner: impl Reducer<I> + 'static,
        field: Field<S, I>,
    ) -> Self {
        Self {
            kind: kind.into(),
            inner: Arc::new(inner),
            field,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The inner reducer's empty value, for building the owner's empty state.
    pub fn empty(&self) -> I {
        self.inner.empty()
    }

    /// Wrap an inner action into this reference's outer action.
    pub fn update(&self, action: &Action) -> Result<Action, ActionError> {
        Action::encode(self.kind.as_str(), action)
    }

    pub fn reduce(&self, state: S, action: &Action) -> Result<S, DispatchError> {
        let current = self.field.get(&state).clone();
        let next = self.inner.reduce(current, action)?;
        Ok(self.field.set(state, next))
    }

    /// The case to register in the owner's reducer chain.
    pub fn case(&self) -> Case<S> {
        let this = self.clone();
        Case::typed(self.kind.clone(), move |state, action: Action| {
            this.reduce(state, &action)
        })
    }

    /// Unkeyed navigation into the referenced field.
    pub fn items(&self) -> Item<S, I> {
        let fetch = self.field.clone();
        let rewrap = self.clone();
        item(
            move |state: &S| fetch.get(state).clone(),
            move |action| Ok(rewrap.update(&action)?),
        )
    }

    pub fn at(&self, outer: &Cursor<S>) -> Cursor<I> {
        self.items().at(outer)
    }
}
