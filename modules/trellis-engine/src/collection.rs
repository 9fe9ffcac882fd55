//! Keyed collections of sub-states.
//!
//! A `Collection` owns one action kind. Its payload addresses an item by key
//! and either removes it, applies an inner action to it, or just makes sure
//! it exists. Container semantics come from an `Operations` implementation,
//! so the same combinator drives a `HashMap`, a `BTreeMap` or anything else.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use trellis_actions::{Action, ActionError};

use crate::cursor::Cursor;
use crate::error::DispatchError;
use crate::field::Field;
use crate::navigate::{items, Items};
use crate::reducer::Case;
use crate::traits::Reducer;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Container semantics for a collection.
///
/// `get` on an absent key must return `empty`, never panic. `remove` on an
/// absent key must return the container unchanged.
pub trait Operations<C, K, I>: Send + Sync {
    fn get(&self, collection: &C, key: &K, empty: I) -> I;

    fn set(&self, collection: C, key: K, item: I) -> C;

    /// `empty` is available for containers that blank a slot instead of
    /// dropping it.
    fn remove(&self, collection: C, key: &K, empty: &I) -> C;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashMapOps;

impl<K, I> Operations<HashMap<K, I>, K, I> for HashMapOps
where
    K: Eq + Hash,
    I: Clone,
{
    fn get(&self, collection: &HashMap<K, I>, key: &K, empty: I) -> I {
        collection.get(key).cloned().unwrap_or(empty)
    }

    fn set(&self, mut collection: HashMap<K, I>, key: K, item: I) -> HashMap<K, I> {
        collection.insert(key, item);
        collection
    }

    fn remove(&self, mut collection: HashMap<K, I>, key: &K, _empty: &I) -> HashMap<K, I> {
        collection.remove(key);
        collection
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BTreeMapOps;

impl<K, I> Operations<BTreeMap<K, I>, K, I> for BTreeMapOps
where
    K: Ord,
    I: Clone,
{
    fn get(&self, collection: &BTreeMap<K, I>, key: &K, empty: I) -> I {
        collection.get(key).cloned().unwrap_or(empty)
    }

    fn set(&self, mut collection: BTreeMap<K, I>, key: K, item: I) -> BTreeMap<K, I> {
        collection.insert(key, item);
        collection
    }

    fn remove(&self, mut collection: BTreeMap<K, I>, key: &K, _empty: &I) -> BTreeMap<K, I> {
        collection.remove(key);
        collection
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Payload of a collection action. `remove` wins over `update`; with
/// neither set the item is created at its empty value if missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload<K> {
    pub key: K,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Action>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub remove: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

pub struct Collection<S, C, K, I> {
    kind: String,
    inner: Arc<dyn Reducer<I>>,
    ops: Arc<dyn Operations<C, K, I>>,
    field: Field<S, C>,
}

impl<S, C, K, I> Clone for Collection<S, C, K, I> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            inner: Arc::clone(&self.inner),
            ops: Arc::clone(&self.ops),
            field: self.field.clone(),
        }
    }
}

impl<S, C, K, I> Collection<S, C, K, I>
where
    S: Clone + Send + Sync + 'static,
    C: Clone + 'static,
    K: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
    I: 'static,
{
    pub fn new(
        kind: impl Into<String>,
        inner: impl Reducer<I> + 'static,
        ops: impl Operations<C, K, I> + 'static,
        field: Field<S, C>,
    ) -> Self {
        Self {
            kind: kind.into(),
            inner: Arc::new(inner),
            ops: Arc::new(ops),
            field,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Make sure `key` exists, at the inner reducer's empty value if new.
    pub fn add(&self, key: K) -> Result<Action, ActionError> {
        self.encode(UpdatePayload {
            key,
            update: None,
            remove: false,
        })
    }

    pub fn remove(&self, key: K) -> Result<Action, ActionError> {
        self.encode(UpdatePayload {
            key,
            update: None,
            remove: true,
        })
    }

    /// Apply `action` to the item at `key`, creating it first if missing.
    pub fn update(&self, key: K, action: Action) -> Result<Action, ActionError> {
        self.encode(UpdatePayload {
            key,
            update: Some(action),
            remove: false,
        })
    }

    fn encode(&self, payload: UpdatePayload<K>) -> Result<Action, ActionError> {
        Action::encode(self.kind.as_str(), &payload)
    }

    /// The item at `key`, or the inner reducer's empty value.
    pub fn item(&self, state: &S, key: &K) -> I {
        self.ops.get(self.field.get(state), key, self.inner.empty())
    }

    pub fn reduce(&self, state: S, payload: UpdatePayload<K>) -> Result<S, DispatchError> {
        let UpdatePayload {
            key,
            update,
            remove,
        } = payload;
        let collection = self.field.get(&state).clone();

        let collection = if remove {
            self.ops.remove(collection, &key, &self.inner.empty())
        } else {
            let item = self.ops.get(&collection, &key, self.inner.empty());
            let item = match update {
                Some(action) => self.inner.reduce(item, &action)?,
                None => item,
            };
            self.ops.set(collection, key, item)
        };

        Ok(self.field.set(state, collection))
    }

    /// The case to register in the owner's reducer chain.
    pub fn case(&self) -> Case<S> {
        let this = self.clone();
        Case::typed(self.kind.clone(), move |state, payload: UpdatePayload<K>| {
            this.reduce(state, payload)
        })
    }

    /// Keyed navigation into this collection.
    pub fn items(&self) -> Items<S, I, K> {
        let fetch = self.clone();
        let rewrap = self.clone();
        items(
            move |state: &S, key: &K| fetch.item(state, key),
            move |key: &K, action| Ok(rewrap.update(key.clone(), action)?),
        )
    }

    /// Cursor over the item at `key`.
    pub fn at(&self, outer: &Cursor<S>, key: K) -> CollectionCursor<S, K, I> {
        CollectionCursor::new(self.kind.clone(), self.items(), outer.clone(), key)
    }
}

// ---------------------------------------------------------------------------
// CollectionCursor
// ---------------------------------------------------------------------------

/// A cursor over one collection item that can also remove the item.
///
/// Derefs to the plain item cursor. `dispatch` is shadowed so the result
/// keeps `remove()`.
pub struct CollectionCursor<S, K, I> {
    cursor: Cursor<I>,
    outer: Cursor<S>,
    key: K,
    kind: String,
    items: Items<S, I, K>,
}

impl<S: Clone, K: Clone, I: Clone> Clone for CollectionCursor<S, K, I> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            outer: self.outer.clone(),
            key: self.key.clone(),
            kind: self.kind.clone(),
            items: self.items.clone(),
        }
    }
}

impl<S, K, I> CollectionCursor<S, K, I>
where
    S: Clone + Send + Sync + 'static,
    K: Clone + Send + Sync + Serialize + 'static,
    I: 'static,
{
    fn new(kind: String, items: Items<S, I, K>, outer: Cursor<S>, key: K) -> Self {
        Self {
            cursor: items.at(&outer, key.clone()),
            outer,
            key,
            kind,
            items,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// The owner cursor this item was derived from.
    pub fn outer(&self) -> &Cursor<S> {
        &self.outer
    }

    pub fn into_cursor(self) -> Cursor<I> {
        self.cursor
    }

    pub fn dispatch(&self, action: Action) -> Result<CollectionCursor<S, K, I>, DispatchError> {
        let outer_action = self.items.rewrap(&self.key, action)?;
        let outer = self.outer.dispatch(outer_action)?;
        Ok(Self::new(
            self.kind.clone(),
            self.items.clone(),
            outer,
            self.key.clone(),
        ))
    }

    /// Remove this item. Returns the owner cursor after the removal.
    pub fn remove(&self) -> Result<Cursor<S>, DispatchError> {
        let action = Action::encode(
            self.kind.as_str(),
            &UpdatePayload {
                key: self.key.clone(),
                update: None,
                remove: true,
            },
        )?;
        self.outer.dispatch(action)
    }
}

impl<S, K, I> Deref for CollectionCursor<S, K, I> {
    type Target = Cursor<I>;

    fn deref(&self) -> &Cursor<I> {
        &self.cursor
    }
}
