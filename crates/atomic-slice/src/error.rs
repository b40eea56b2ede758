//! Error types for slice setup.
//!
//! Every error here is raised while a slice is being built or while action
//! creators are being wrapped. Dispatch itself never fails: actions that do
//! not belong to a slice are ignored.

use thiserror::Error;

/// A slice definition that cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The slice name is empty.
    #[error("slice name must be a non-empty string")]
    EmptySliceName,

    /// Another live slice in the same catalog already uses this name.
    #[error("duplicate slice name: {0}")]
    DuplicateSlice(String),

    /// A wire type of one live slice would also be routed by another.
    #[error("error in slice {slice}: {action_type} would also route to slice {other}")]
    ConflictingActionType {
        slice: String,
        other: String,
        action_type: String,
    },

    /// A transition factory was registered without a name.
    #[error("error in slice {slice}: could not ascertain name of reducer {index}/{total}")]
    UnnamedReducer {
        slice: String,
        index: usize,
        total: usize,
    },

    /// Two transition factories share an action name.
    #[error("error in slice {slice}: duplicate reducer name {action}")]
    DuplicateReducer { slice: String, action: String },

    /// The action name contains the slice token and would decode to something else.
    #[error("error in slice {slice}: reducer name {action} contains '{slice}_' and cannot be routed")]
    AmbiguousReducer { slice: String, action: String },

    /// A listener was registered for an empty action type.
    #[error("error in slice {slice}: listener action type must be a non-empty string")]
    EmptyListenerType { slice: String },

    /// Two listeners match the same action type.
    #[error("error in slice {slice}: duplicate listener for {action_type}")]
    DuplicateListener { slice: String, action_type: String },
}

/// An action creator that cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// The action name passed to `wrap` is empty.
    #[error("error in wrap for {slice}: action name must be a non-empty string")]
    InvalidActionName { slice: String },

    /// The action name was never registered with the slice.
    #[error("error in wrap for {slice}: {action} has not been registered with this slice")]
    UnregisteredAction { slice: String, action: String },

    /// The requested argument type differs from the registered one.
    #[error("error in wrap for {slice}: {action} takes {expected}, not {requested}")]
    ArgumentMismatch {
        slice: String,
        action: String,
        expected: &'static str,
        requested: &'static str,
    },
}

/// Any setup error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Result type for slice setup.
pub type Result<T> = std::result::Result<T, Error>;
