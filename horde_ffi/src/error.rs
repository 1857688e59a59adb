//! Boundary-tier validation errors.
//!
//! The foreign-call surface never unwinds and never returns rich error
//! objects; a rejected call produces a log line plus a sentinel status value.
//! This enum exists so validation failures have one typed, printable shape
//! between the check and the log call.

use thiserror::Error;

/// Why a foreign call was rejected before reaching the core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("received null pointer for {0}")]
    NullPointer(&'static str),

    #[error("received non-positive element count for {0}")]
    NonPositiveCount(&'static str),
}
