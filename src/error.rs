//! Errors returned by fallible [`Dict`](crate::Dict) operations.
//!
//! Every error is detected before the map is touched, so a failed call
//! leaves the map exactly as it was.

use alloc::string::String;

use thiserror::Error;

/// Error type for dictionary operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// A constructor was given arguments it cannot pair up.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The key passed to [`Dict::pop`](crate::Dict::pop) is not present.
    #[error("key not found")]
    KeyNotFound,

    /// [`Dict::pop_item`](crate::Dict::pop_item) was called on an empty map.
    #[error("pop_item on an empty dict")]
    EmptyContainer,
}

/// Result type specialized for [`DictError`].
pub type Result<T> = core::result::Result<T, DictError>;
