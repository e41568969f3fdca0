//! Enrollment error types.

use thiserror::Error;

/// Reasons an enrollment request is refused. None of them mutate state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("student {reg_no} is already enrolled in course {course_code}")]
    DuplicateEnrollment { reg_no: String, course_code: String },

    #[error("cannot enroll: exceeds max credit limit of {limit} for the semester")]
    MaxCreditExceeded { limit: u32 },

    #[error("no student with registration number {0}")]
    StudentNotFound(String),

    #[error("no course with code {0}")]
    CourseNotFound(String),
}
