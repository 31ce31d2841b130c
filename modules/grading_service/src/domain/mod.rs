//! Domain layer - business logic and services

pub mod events;
pub mod grade;
pub mod report;
pub mod repository;
pub mod service;
pub mod validation;

pub use events::{EventPublisher, MarkEvent, NoOpEventPublisher, TracingEventPublisher};
pub use repository::{DuplicateKey, MarkRepository, UserRepository};
pub use service::Service;
