//! Leaf fields that are only ever replaced wholesale.

use serde::de::DeserializeOwned;
use serde::Serialize;
use trellis_actions::{Action, ActionError};

use crate::cursor::Cursor;
use crate::error::DispatchError;
use crate::field::Field;
use crate::reducer::Case;
use crate::reference::Reference;
use crate::traits::Reducer;

pub const REPLACE_KIND: &str = "replace";

/// Inner action that replaces a property's whole value.
pub fn replace<T: Serialize + ?Sized>(value: &T) -> Result<Action, ActionError> {
    Action::encode(REPLACE_KIND, value)
}

/// Reducer with a single case: `replace`, whose payload is the new value.
#[derive(Debug, Clone)]
pub struct Replace<T> {
    empty: T,
}

impl<T> Replace<T> {
    pub fn new(empty: T) -> Self {
        Self { empty }
    }
}

impl<T> Reducer<T> for Replace<T>
where
    T: Clone + Send + Sync + DeserializeOwned,
{
    fn empty(&self) -> T {
        self.empty.clone()
    }

    fn reduce(&self, state: T, action: &Action) -> Result<T, DispatchError> {
        if !action.is(REPLACE_KIND) {
            return Ok(state);
        }
        Ok(action.decode()?)
    }
}

/// A `Reference` over `Replace<T>`: a scalar field with a cursor.
pub struct Property<S, T> {
    reference: Reference<S, T>,
}

impl<S, T> Clone for Property<S, T> {
    fn clone(&self) -> Self {
        Self {
            reference: self.reference.clone(),
        }
    }
}

impl<S, T> Property<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn new(kind: impl Into<String>, empty: T, field: Field<S, T>) -> Self {
        Self {
            reference: Reference::new(kind, Replace::new(empty), field),
        }
    }

    pub fn kind(&self) -> &str {
        self.reference.kind()
    }

    pub fn empty(&self) -> T {
        self.reference.empty()
    }

    /// Outer action setting the property to `value`.
    pub fn set(&self, value: &T) -> Result<Action, ActionError> {
        self.reference.update(&replace(value)?)
    }

    pub fn case(&self) -> Case<S> {
        self.reference.case()
    }

    pub fn at(&self, outer: &Cursor<S>) -> Cursor<T> {
        self.reference.at(outer)
    }
}

/// Replace the value behind a property cursor.
pub fn assign<T: Serialize>(cursor: &Cursor<T>, value: &T) -> Result<Cursor<T>, DispatchError> {
    cursor.dispatch(replace(value)?)
}
