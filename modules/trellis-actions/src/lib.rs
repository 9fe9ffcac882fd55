//! Generic, domain-agnostic action envelope.
//!
//! An action is a tag (`kind`) plus an opaque JSON payload. Zero knowledge of
//! reducers, cursors, or any state shape.
//!
//! Consumers provide their own action types that serialize to `serde_json::Value`,
//! either by building `Action`s directly or by implementing `ActionLike`.

pub mod action;
pub mod actionlike;

pub use action::{Action, ActionError};
pub use actionlike::ActionLike;
