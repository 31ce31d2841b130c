//! Grading Service Module
//!
//! Mark submission and grading for the school-management backend.
//! Marks are keyed on (student, subject, exam period); grades are always
//! derived from the score server-side.

// Public exports
pub mod contract;
pub use contract::{
    client::GradingApi, error::GradingError, BulkOutcome, CallerContext, EntryFailure, Grade,
    Mark, MarkFilter, MarkRecord, NewMark, RawMarkEntry, RawScore, Role, StudentReport, User,
};

pub mod module;
pub use module::GradingServiceModule;

pub mod config;
pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
