//! `crosscheck-recon` — field-level reconciliation of two keyed record sets.
//!
//! Pure engine crate: receives pre-loaded records, returns the reconciled
//! table, mismatch entries, and per-field summary. No CLI or IO dependencies.

pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod join;
pub mod mismatch;
pub mod model;
pub mod normalize;
pub mod schema;
pub mod summary;

pub use config::ReconcileConfig;
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{ReconcileOutput, Record, Value};
