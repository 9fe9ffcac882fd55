use thiserror::Error;
use trellis_actions::ActionError;

/// Construction-time errors. Always surfaced to whoever is building the
/// reducer, collection or reference; never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Duplicate action kind `{0}` in reducer chain (use `shadow` to override on purpose)")]
    DuplicateKind(String),

    #[error("Getter `{getter}` is too complex to auto-derive; supply an explicit setter")]
    GetterTooComplex { getter: String },

    #[error("Getter `{getter}` reads `{object}` but its parameter is `{param}`; supply an explicit setter")]
    ParameterMismatch {
        getter: String,
        param: String,
        object: String,
    },

    #[error("Configuration error: {var}={value:?} is not a valid value")]
    InvalidEnv { var: String, value: String },
}

/// Errors raised while reducing an action.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Payload for `{kind}` does not match its handler: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Handler for `{kind}` failed: {source}")]
    Handler {
        kind: String,
        #[source]
        source: anyhow::Error,
    },
}
