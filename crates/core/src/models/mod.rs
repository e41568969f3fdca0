#![allow(missing_docs)]

//! Shared domain models.
//!
//! People (students and instructors), courses and the small value types
//! attached to them. Identity is always decided by business keys:
//! a course by its code, a person by id and email together.

mod course;
mod grade;
mod person;

pub use course::{
    Course, CourseBuilder, ParseSemesterError, Semester, SharedCourse, DEFAULT_CREDITS,
    DEFAULT_DEPARTMENT,
};
pub use grade::{Grade, ParseGradeError};
pub use person::{Instructor, Person, PersonInfo, Profile, Student, StudentStatus};

/// Unicode-aware case-insensitive comparison used for registration numbers
/// and course codes.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
