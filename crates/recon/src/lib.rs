//! `serialsync-recon` — ERP/WMS serial-number reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded source rows, returns reconciled
//! records. No CLI or file IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod normalize;
pub mod summary;

pub use config::{AbsencePolicy, DevicePrecedence, ReconConfig};
pub use engine::{run, run_with_progress};
pub use error::ReconError;
pub use model::{Presence, ReconInput, ReconResult, ReconSummary, ReconciledSerial, Source, SourceRow, SyncStatus};
pub use normalize::{normalize_location, LocationNormalizer, LocationRule};
