// Error types for the spyglass core.

use std::fmt;

use spyglass_ffi::ConsoleStatus;

/// Rich error type for console operations.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleError {
    NotInitialized,
    AlreadyInitialized,
    InvalidLogType(u8),
    DuplicateId(i32),
    UnknownId(i32),
    IndexOutOfRange { index: usize, count: usize },
    InvalidValue(String),
    InvalidArgument(String),
    Internal(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::NotInitialized => write!(f, "console plugin is not initialized"),
            ConsoleError::AlreadyInitialized => write!(f, "console plugin is already initialized"),
            ConsoleError::InvalidLogType(raw) => write!(f, "invalid log type code: {raw}"),
            ConsoleError::DuplicateId(id) => write!(f, "id already registered: {id}"),
            ConsoleError::UnknownId(id) => write!(f, "unknown id: {id}"),
            ConsoleError::IndexOutOfRange { index, count } => {
                write!(f, "index out of range: {index} (count: {count})")
            }
            ConsoleError::InvalidValue(value) => write!(f, "invalid value: {value}"),
            ConsoleError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ConsoleError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ConsoleError {}

/// Convenience alias used throughout the core and the bridge layer.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    /// Status code reported to the engine for this error.
    pub fn status(&self) -> ConsoleStatus {
        match self {
            ConsoleError::NotInitialized => ConsoleStatus::NotInitialized,
            ConsoleError::AlreadyInitialized => ConsoleStatus::AlreadyInitialized,
            ConsoleError::InvalidLogType(_) => ConsoleStatus::InvalidLogType,
            ConsoleError::DuplicateId(_) => ConsoleStatus::DuplicateId,
            ConsoleError::UnknownId(_) => ConsoleStatus::UnknownId,
            ConsoleError::IndexOutOfRange { .. } => ConsoleStatus::IndexOutOfRange,
            ConsoleError::InvalidValue(_) => ConsoleStatus::InvalidValue,
            ConsoleError::InvalidArgument(_) => ConsoleStatus::InvalidArgument,
            ConsoleError::Internal(_) => ConsoleStatus::InternalError,
        }
    }
}

/// Collapse a `ConsoleResult` into the status code crossing the bridge.
pub fn status_of<T>(result: &ConsoleResult<T>) -> ConsoleStatus {
    match result {
        Ok(_) => ConsoleStatus::Ok,
        Err(e) => e.status(),
    }
}
