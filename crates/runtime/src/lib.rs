//! Runtime orchestration for the team-state transaction engine.
//!
//! This crate wires together the remote store abstraction, the retry policy,
//! the team record repository, and the telemetry sidecar into a cohesive
//! submission API. Consumers embed [`QuestCoordinator`] to authenticate teams
//! and drive quest submissions against one shared store.
//!
//! Modules are organized by responsibility:
//! - [`coordinator`] hosts the transaction orchestrator
//! - [`repository`] and [`store`] provide the data adapters
//! - [`retry`] bounds every remote call with exponential backoff
//! - [`telemetry`] keeps the metrics side-channel fail-open
//! - [`session`], [`auth`], [`config`], and [`error`] carry the supporting
//!   state, credentials, configuration, and user-facing message mapping
pub mod auth;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod repository;
pub mod retry;
pub mod session;
pub mod store;
pub mod telemetry;

pub use auth::{AuthError, hash_pin, verify_pin};
pub use config::RuntimeConfig;
pub use coordinator::{QuestCommit, QuestCoordinator};
pub use error::{MSG_RATE_LIMITED, MSG_STORE_UNAVAILABLE, MSG_UNEXPECTED, SubmitError};
pub use repository::{RepositoryError, TeamRepository, decode_row, encode_row};
pub use retry::{RetryError, RetryPolicy};
pub use session::SessionState;
pub use store::{
    COLUMNS, FIRST_DATA_ROW, InMemorySheet, RawRow, SheetStore, StoreError, WriteFault,
};
pub use telemetry::{
    ConfiguredSink, DatadogSink, MetricSink, NullSink, RecordingSink, TelemetryError,
    TelemetrySidecar,
};
