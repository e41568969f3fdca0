#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Campus Course & Records Manager.
//!
//! Everything here is frontend-agnostic; the `ccrm` binary drives it
//! through a numbered menu.

pub mod backup;
pub mod config;
pub mod enrollment;
pub mod models;
pub mod persistence;
pub mod store;

pub use backup::{directory_size, BackupReport, BackupService};
pub use config::AppConfig;
pub use enrollment::{EnrollmentError, EnrollmentService, MAX_CREDITS_PER_SEMESTER};
pub use models::{
    Course, CourseBuilder, Grade, Instructor, Person, PersonInfo, Profile, Semester,
    SharedCourse, Student, StudentStatus,
};
pub use persistence::{DataPersistence, RecordParseError};
pub use store::{RecordStore, Records};
