//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::GradingApi;
pub use error::GradingError;
pub use model::{
    BulkOutcome, CallerContext, EntryFailure, Grade, GradeHistogram, Mark, MarkFilter, MarkRecord,
    NewMark, PeriodSummary, RawMarkEntry, RawScore, ReportSummary, Role, StudentReport, User,
};
