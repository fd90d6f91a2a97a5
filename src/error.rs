//! Error taxonomy for `SliceMap` operations.

use thiserror::Error;

/// Broad category of a [`SliceError`].
///
/// `Key` covers lookups of absent keys, `Type` a malformed slice step and
/// `Value` a step of zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Key,
    Type,
    Value,
}

#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SliceError {
    /// A key required to be present (point key, range bound, or the
    /// reference key of a positional insert) is absent.
    #[error("key not found")]
    KeyNotFound,

    #[error("map is empty")]
    Empty,

    /// The node a detached cursor was positioned on has been removed.
    #[error("cursor position was removed from the map")]
    Invalidated,

    #[error("slice step cannot be zero")]
    ZeroStep,

    #[error("slice step must be 1, -1 or unset, got {0}")]
    UnsupportedStep(isize),
}

impl SliceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SliceError::KeyNotFound | SliceError::Empty | SliceError::Invalidated => ErrorKind::Key,
            SliceError::UnsupportedStep(_) => ErrorKind::Type,
            SliceError::ZeroStep => ErrorKind::Value,
        }
    }
}
