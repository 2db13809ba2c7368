//! Stratified random team draw.
//!
//! Splits a rated roster into balanced teams: players are grouped by role
//! and skill tier, each group is shuffled and dealt round-robin over a
//! freshly shuffled team order, and per-role capacities are never exceeded.
//! Players that cannot be seated are returned in [`Partition::overflow`].

pub mod types;
pub mod error;
pub mod formation;
pub mod shuffle;
pub mod allocator;
pub mod validator;
pub mod draw;
pub mod adhoc;
pub mod settings;
pub mod audit;

#[cfg(test)]
mod tests;

pub use types::*;
pub use error::{DrawError, Result};
pub use formation::{resolve, Formation};
pub use allocator::SeatingPolicy;
pub use validator::{validate, ValidationReport, Shortfall};
pub use draw::{draw, run_draw};
pub use adhoc::{draw_adhoc, AdhocConfig, AdhocDraw};
pub use settings::{parse_roster, parse_settings, DrawSettings};
pub use audit::{audit, AuditSummary};
