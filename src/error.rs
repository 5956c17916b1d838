//! Error types for the rectangle store, the interaction state machine and
//! persistence.
//!
//! None of these reach the user as a dialog. Callers log them and fall back
//! to a safe state: an unchanged store, an aborted gesture, or an empty
//! diagram.

use std::io;

use thiserror::Error;

use crate::model::RectId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("rectangle {0} already exists")]
    DuplicateId(RectId),

    #[error("no rectangle ids left to allocate")]
    IdsExhausted,
}

#[derive(Debug, Error, PartialEq)]
pub enum InteractionError {
    /// A value the gesture needs from the view, such as the canvas position,
    /// was not provided. The gesture is aborted.
    #[error("precondition failed: {0} unavailable")]
    PreconditionFailure(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(#[from] serde_json::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode TOML settings: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("failed to encode JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}
