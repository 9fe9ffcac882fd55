//! Navigation combinators: derive an inner cursor from an outer one.
//!
//! An inner cursor holds no state of its own beyond its snapshot. Its
//! dispatch re-wraps the inner action into an outer action addressed at the
//! same key, dispatches that on the outer cursor, and re-derives from the
//! result.

use std::sync::Arc;

use trellis_actions::Action;

use crate::cursor::{Cursor, Navigator};
use crate::error::DispatchError;

type Fetch<O, I, K> = Arc<dyn Fn(&O, &K) -> I + Send + Sync>;
type Rewrap<K> = Arc<dyn Fn(&K, Action) -> Result<Action, DispatchError> + Send + Sync>;

/// Keyed navigation from `O` into items of type `I`.
pub struct Items<O, I, K> {
    fetch: Fetch<O, I, K>,
    rewrap: Rewrap<K>,
}

impl<O, I, K> Clone for Items<O, I, K> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
            rewrap: Arc::clone(&self.rewrap),
        }
    }
}

/// Build a keyed navigation combinator from a fetch/rewrap pair.
pub fn items<O, I, K, F, W>(fetch: F, rewrap: W) -> Items<O, I, K>
where
    O: 'static,
    I: 'static,
    K: 'static,
    F: Fn(&O, &K) -> I + Send + Sync + 'static,
    W: Fn(&K, Action) -> Result<Action, DispatchError> + Send + Sync + 'static,
{
    Items {
        fetch: Arc::new(fetch),
        rewrap: Arc::new(rewrap),
    }
}

impl<O, I, K> Items<O, I, K>
where
    O: Clone + Send + Sync + 'static,
    I: 'static,
    K: Clone + Send + Sync + 'static,
{
    /// Cursor over the item at `key` in `outer`'s snapshot.
    pub fn at(&self, outer: &Cursor<O>, key: K) -> Cursor<I> {
        let state = (self.fetch)(outer.state(), &key);
        Cursor::new(
            state,
            outer.version(),
            Arc::new(ItemsNavigator {
                items: self.clone(),
                outer: outer.clone(),
                key,
            }),
        )
    }

    /// Translate an inner action into the outer action addressed at `key`.
    pub(crate) fn rewrap(&self, key: &K, action: Action) -> Result<Action, DispatchError> {
        (self.rewrap)(key, action)
    }
}

struct ItemsNavigator<O, I, K> {
    items: Items<O, I, K>,
    outer: Cursor<O>,
    key: K,
}

impl<O, I, K> Navigator<I> for ItemsNavigator<O, I, K>
where
    O: Clone + Send + Sync + 'static,
    I: 'static,
    K: Clone + Send + Sync + 'static,
{
    fn dispatch(&self, action: Action) -> Result<Cursor<I>, DispatchError> {
        let outer_action = self.items.rewrap(&self.key, action)?;
        let outer = self.outer.dispatch(outer_action)?;
        Ok(self.items.at(&outer, self.key.clone()))
    }
}

/// Unkeyed navigation: `Items` with the key fixed to `()`.
pub struct Item<O, I> {
    items: Items<O, I, ()>,
}

impl<O, I> Clone for Item<O, I> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

pub fn item<O, I, F, W>(fetch: F, rewrap: W) -> Item<O, I>
where
    O: 'static,
    I: 'static,
    F: Fn(&O) -> I + Send + Sync + 'static,
    W: Fn(Action) -> Result<Action, DispatchError> + Send + Sync + 'static,
{
    Item {
        items: items(
            move |outer: &O, _: &()| fetch(outer),
            move |_: &(), action| rewrap(action),
        ),
    }
}

impl<O, I> Item<O, I>
where
    O: Clone + Send + Sync + 'static,
    I: 'static,
{
    pub fn at(&self, outer: &Cursor<O>) -> Cursor<I> {
        self.items.at(outer, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::{Case, Chain};
    use crate::store::MemoryStore;
    use crate::traits::Store;
    use serde_json::json;
    use std::collections::BTreeMap;

    type Scores = BTreeMap<String, i64>;

    /// Outer actions are `SCORE { name, by }`; inner actions are `BUMP(by)`.
    fn scores() -> (Arc<MemoryStore<Scores>>, Items<Scores, i64, String>) {
        #[derive(serde::Deserialize)]
        struct Score {
            name: String,
            by: i64,
        }

        let chain = Chain::new(Scores::new())
            .chain(Case::new("SCORE", |mut s: Scores, p: Score| {
                *s.entry(p.name).or_insert(0) += p.by;
                s
            }))
            .unwrap();
        let store = Arc::new(MemoryStore::new(chain.into_transition()).unwrap());

        let nav = items(
            |s: &Scores, name: &String| s.get(name).copied().unwrap_or(0),
            |name: &String, inner: Action| {
                let by: i64 = inner.decode()?;
                Ok(Action::new("SCORE", json!({ "name": name, "by": by })))
            },
        );
        (store, nav)
    }

    #[test]
    fn inner_state_is_fetched_from_outer_snapshot() {
        let (store, nav) = scores();
        let outer = Cursor::snapshot(&store);
        assert_eq!(*nav.at(&outer, "ada".to_string()).state(), 0);
    }

    #[test]
    fn inner_dispatch_goes_through_the_outer_cursor() {
        let (store, nav) = scores();
        let ada = nav.at(&Cursor::snapshot(&store), "ada".to_string());

        let ada = ada.dispatch(Action::new("BUMP", json!(3))).unwrap();
        let ada = ada.dispatch(Action::new("BUMP", json!(4))).unwrap();

        assert_eq!(*ada.state(), 7);
        assert_eq!(store.get_state().get("ada"), Some(&7));
        assert_eq!(ada.version(), store.version());
    }

    #[test]
    fn unkeyed_item_navigates_without_a_key() {
        let (store, _) = scores();
        let total = item(
            |s: &Scores| s.values().sum::<i64>(),
            |inner: Action| {
                let by: i64 = inner.decode()?;
                Ok(Action::new("SCORE", json!({ "name": "total", "by": by })))
            },
        );

        let cursor = total.at(&Cursor::snapshot(&store));
        let cursor = cursor.dispatch(Action::new("BUMP", json!(2))).unwrap();
        assert_eq!(*cursor.state(), 2);
    }
}
