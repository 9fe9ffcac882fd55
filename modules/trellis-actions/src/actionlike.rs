use crate::action::Action;

/// Trait for typed action enums.
///
/// A domain models its actions as one enum with an exhaustive `kind()` match,
/// then hands `to_action()` to a cursor or store. The tag must match the kind
/// the handling case was registered under.
pub trait ActionLike: std::fmt::Debug + Send + Sync {
    /// The tag string for this variant.
    fn kind(&self) -> &'static str;

    /// Serialize the variant's data to the JSON payload.
    fn to_payload(&self) -> serde_json::Value;

    fn to_action(&self) -> Action {
        Action::new(self.kind(), self.to_payload())
    }
}
