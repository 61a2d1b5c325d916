#![forbid(unsafe_code)]

//! Core domain model and business logic for the wellness service.
//!
//! This crate provides:
//! - Domain types (profiles, assessments, recommendations)
//! - The health metrics engine (BMI, category, score, recommendations)
//! - Boundary validation
//! - Persistence (profile store, assessment journal, CSV export)
//! - Chat reply post-processing

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod bmi;
pub mod score;
pub mod recommend;
pub mod engine;
pub mod validate;
pub mod store;
pub mod journal;
pub mod export;
pub mod chat;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use types::*;
pub use config::Config;
pub use bmi::{categorize, compute_bmi};
pub use score::{compute_score, score_breakdown, ScoreBreakdown};
pub use recommend::recommend;
pub use engine::assess;
pub use validate::validate;
pub use store::{JsonProfileStore, ProfileStore};
pub use export::{export_csv, export_journal, ExportSummary};
pub use journal::{AssessmentSink, JournalScan, JsonlJournal};
pub use chat::{ChatBackend, ChatError, ChatProxy};
