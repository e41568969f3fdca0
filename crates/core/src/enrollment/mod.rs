#![allow(missing_docs)]

//! Enrollment business rules.

mod error;
mod service;

pub use error::EnrollmentError;
pub use service::{EnrollmentService, MAX_CREDITS_PER_SEMESTER};
