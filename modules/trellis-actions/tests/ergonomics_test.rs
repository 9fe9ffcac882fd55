//! Ergonomics and usage pattern tests for the action envelope.

use serde::{Deserialize, Serialize};
use serde_json::json;
use trellis_actions::{Action, ActionLike};

// =========================================================================
// Typed action enum via ActionLike
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CartAction {
    AddLine { sku: String, qty: u32 },
    Clear,
}

impl ActionLike for CartAction {
    fn kind(&self) -> &'static str {
        match self {
            CartAction::AddLine { .. } => "cart:add_line",
            CartAction::Clear => "cart:clear",
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("CartAction serialization should never fail")
    }
}

#[test]
fn actionlike_produces_tagged_action() {
    let action = CartAction::AddLine {
        sku: "tea".into(),
        qty: 2,
    }
    .to_action();

    assert_eq!(action.kind, "cart:add_line");
    assert_eq!(action.payload["sku"], "tea");
    assert_eq!(action.payload["qty"], 2);
}

#[test]
fn every_variant_has_a_distinct_kind() {
    let all = [
        CartAction::AddLine {
            sku: "x".into(),
            qty: 1,
        },
        CartAction::Clear,
    ];
    let mut kinds: Vec<&str> = all.iter().map(|a| a.kind()).collect();
    kinds.sort();
    kinds.dedup();
    assert_eq!(kinds.len(), all.len());
}

// =========================================================================
// Action serialization
// =========================================================================

#[test]
fn action_is_serializable_for_logging() {
    let action = Action::new("SET_PRICE", json!(3.99));
    let text = serde_json::to_string(&action).unwrap();
    assert!(text.contains("SET_PRICE"));

    let back: Action = serde_json::from_str(&text).unwrap();
    assert_eq!(back, action);
}

#[test]
fn nested_action_survives_as_payload() {
    let inner = Action::new("SET_PRICE", json!(3.99));
    let outer = Action::encode("ITEMS", &json!({"key": 3, "update": inner})).unwrap();

    let decoded: Action = serde_json::from_value(outer.payload["update"].clone()).unwrap();
    assert!(decoded.is("SET_PRICE"));
    assert_eq!(decoded.decode::<f64>().unwrap(), 3.99);
}
