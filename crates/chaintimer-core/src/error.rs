//! Error types for chaintimer-core.
//!
//! Two tiers, per the app's constrained-hardware heritage:
//!
//! 1. Programmer-error invariant violations are `debug_assert!`s -- fatal in
//!    debug builds, compiled out in release.
//! 2. Expected external failures (storage, wakeup scheduling) get typed
//!    errors here, and are always recovered locally: a load failure falls
//!    back to default state, a scheduling failure degrades to "no background
//!    wake". Domain operations never hand a recoverable error back to the
//!    presentation layer.

use std::path::PathBuf;
use thiserror::Error;

/// Persisted-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store file
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Underlying SQLite query failed
    #[error("Store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Record decode failed
    #[error("Record at key {key} is corrupt: {source}")]
    CorruptRecord {
        key: i64,
        #[source]
        source: serde_json::Error,
    },

    /// Record encode failed
    #[error("Record encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Expected record missing from the stream
    #[error("Missing record at key {0}")]
    MissingRecord(i64),

    /// Persisted schema version does not match; state is discarded
    #[error("Store version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: i64, expected: i64 },
}

/// Why the platform refused to schedule a wakeup.
///
/// All variants are non-fatal: the wakeup simply doesn't happen and the
/// timer only counts down while the app is foregrounded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// Requested fire time is in the past or too far out
    #[error("wakeup time out of range")]
    OutOfRange,

    /// Malformed request
    #[error("invalid wakeup argument")]
    InvalidArgument,

    /// Platform limit on pending wakeups reached
    #[error("no wakeup slots available")]
    OutOfResources,

    /// Unspecified platform error
    #[error("internal wakeup error")]
    Internal,
}
