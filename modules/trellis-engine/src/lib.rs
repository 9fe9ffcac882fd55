//! Composable reducers and cursor navigation.
//!
//! Build one transition function out of independently defined cases
//! (`Chain`), hand it to a store, then navigate the store's state with
//! cursors: dispatching on a cursor deep inside the state re-wraps the
//! action until it is addressed at the top level.
//!
//! Consumers define their domain with `Case`s, `Collection`s, `Reference`s
//! and `Property`s, wiring each into the owner's chain with `case()`.

pub mod collection;
pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod navigate;
pub mod property;
pub mod reducer;
pub mod reference;
pub mod store;
pub mod traits;

pub use collection::{
    BTreeMapOps, Collection, CollectionCursor, HashMapOps, Operations, UpdatePayload,
};
pub use config::{Config, UnhandledPolicy};
pub use cursor::{Cursor, Navigator};
pub use error::{ConfigError, DispatchError};
pub use field::Field;
pub use navigate::{item, items, Item, Items};
pub use property::{assign, replace, Property, Replace, REPLACE_KIND};
pub use reducer::{Case, Chain, Transition};
pub use reference::Reference;
pub use store::{MemoryStore, Subscription, INIT_KIND};
pub use traits::{Listener, Reducer, Store};
pub use trellis_actions::{Action, ActionError, ActionLike};
