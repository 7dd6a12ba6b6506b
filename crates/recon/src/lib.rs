//! `docmatch-recon` — Provider roster reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns matched pairs and
//! the unmatched remainder. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;

pub use config::MatchConfig;
pub use engine::Reconciler;
pub use error::ReconError;
pub use model::{Address, MatchRule, MatchedPair, ReconResult, ReconSummary, Record};
