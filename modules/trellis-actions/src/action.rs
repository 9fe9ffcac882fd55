//! Core types for the action envelope. Domain-agnostic.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A request to transition state. Immutable once built; reducers read it by
/// reference and navigators re-wrap it into new actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Failed to encode payload for `{kind}`: {source}")]
    Encode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode payload for `{kind}`: {source}")]
    Decode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Action {
    /// Create an action from an already-built JSON payload.
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// An action that carries no payload (`null`).
    pub fn bare(kind: impl Into<String>) -> Self {
        Self::new(kind, serde_json::Value::Null)
    }

    /// Create an action from anything that serializes to JSON.
    pub fn encode<P: Serialize + ?Sized>(
        kind: impl Into<String>,
        payload: &P,
    ) -> Result<Self, ActionError> {
        let kind = kind.into();
        match serde_json::to_value(payload) {
            Ok(payload) => Ok(Self { kind, payload }),
            Err(source) => Err(ActionError::Encode { kind, source }),
        }
    }

    /// Read the payload back as a typed value.
    pub fn decode<P: DeserializeOwned>(&self) -> Result<P, ActionError> {
        P::deserialize(&self.payload).map_err(|source| ActionError::Decode {
            kind: self.kind.clone(),
            source,
        })
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SetPrice {
        price: f64,
    }

    #[test]
    fn bare_action_has_null_payload() {
        let action = Action::bare("INCR");
        assert_eq!(action.kind, "INCR");
        assert!(action.payload.is_null());
    }

    #[test]
    fn encode_then_decode_typed_payload() {
        let action = Action::encode("SET_PRICE", &SetPrice { price: 3.99 }).unwrap();
        assert_eq!(action.payload, json!({"price": 3.99}));
        assert_eq!(action.decode::<SetPrice>().unwrap(), SetPrice { price: 3.99 });
    }

    #[test]
    fn decode_mismatch_names_the_kind() {
        let action = Action::new("SET_PRICE", json!("not a number"));
        let err = action.decode::<f64>().unwrap_err();
        assert!(err.to_string().contains("SET_PRICE"));
    }

    #[test]
    fn missing_payload_deserializes_to_null() {
        let action: Action = serde_json::from_value(json!({"kind": "INCR"})).unwrap();
        assert_eq!(action, Action::bare("INCR"));
    }
}
