//! Job lifecycle: creation, status transitions, assignment.
//!
//! Creation runs one matching pass synchronously before returning.

pub mod activities;
pub mod errors;
pub mod models;

pub use errors::{JobError, JobResult};
pub use models::{Job, JobPatch, JobStatus, NewJob};
