// ═══════════════════════════════════════════════════════════════════════
// Errors — everything the engine can refuse to do
// ═══════════════════════════════════════════════════════════════════════

use thiserror::Error;

use crate::validator::ValidationReport;

/// Errors reported to the immediate caller. None of them are transient,
/// so retrying with the same input gives the same answer.
///
/// Overflow is deliberately absent: a draw that could not seat everyone
/// still returns a `Partition`, with the leftovers in `Partition::overflow`.
#[derive(Debug, Error)]
pub enum DrawError {
    /// Formation descriptor is not three dash-separated non-negative integers.
    #[error("invalid formation format {0:?}: expected DEF-MID-FW (e.g. \"4-4-2\")")]
    InvalidFormationFormat(String),

    /// Team count, capacities or roster records are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Pre-flight check failed; the report lists the deficit per role.
    #[error("insufficient roster: {0}")]
    InsufficientRoster(ValidationReport),
}

pub type Result<T> = std::result::Result<T, DrawError>;
