//! Domain logic for the Ridgeline contracting backend.
//!
//! Pure, storage-independent pieces: the status state machines, the
//! trade-to-section taxonomy, the line-item reconciliation planner, and
//! the bid-to-plan conversion mapping. No I/O happens in this crate.

pub mod convert;
pub mod error;
pub mod reconcile;
pub mod roles;
pub mod status;
pub mod trade;
pub mod types;
