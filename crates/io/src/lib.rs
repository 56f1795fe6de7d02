//! `crosscheck-io` — Loader and Writer collaborators.
//!
//! Owns every file-format concern the engine refuses to: CSV/TSV import with
//! delimiter sniffing and encoding fallback, Excel import, and persistence of
//! the three result tables. The engine crate never sees a path.

pub mod csv;
pub mod error;
pub mod xlsx;

pub use error::IoError;
