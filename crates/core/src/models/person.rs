use std::{
    fmt,
    hash::{Hash, Hasher},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{course::Semester, eq_ignore_case, Course, SharedCourse};

/// Anything that can render a human-readable profile summary.
pub trait Profile {
    /// Multi-line description suitable for listing in a terminal.
    fn profile(&self) -> String;
}

/// Fields shared by every person known to the institution.
///
/// Two records describe the same person only when both `id` and `email`
/// match; neither field alone is sufficient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonInfo {
    /// Numeric identifier.
    pub id: i32,
    /// Full display name.
    pub full_name: String,
    /// Contact email address.
    pub email: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
}

impl PersonInfo {
    /// Bundle the common person fields.
    pub fn new(
        id: i32,
        full_name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            date_of_birth,
        }
    }

    /// Identity check on the `(id, email)` business key.
    pub fn same_person(&self, other: &PersonInfo) -> bool {
        self.id == other.id && self.email == other.email
    }
}

impl PartialEq for PersonInfo {
    fn eq(&self, other: &Self) -> bool {
        self.same_person(other)
    }
}

impl Eq for PersonInfo {}

impl Hash for PersonInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.email.hash(state);
    }
}

/// Enrollment standing of a student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Graduated => "Graduated",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student and the ordered set of courses they are enrolled in.
#[derive(Debug, Clone)]
pub struct Student {
    pub info: PersonInfo,
    /// Registration number, the key used for every external lookup.
    pub reg_no: String,
    pub status: StudentStatus,
    enrolled_courses: Vec<SharedCourse>,
}

impl Student {
    /// Create an active student with no enrollments.
    pub fn new(
        id: i32,
        full_name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
        reg_no: impl Into<String>,
    ) -> Self {
        Self {
            info: PersonInfo::new(id, full_name, email, date_of_birth),
            reg_no: reg_no.into(),
            status: StudentStatus::default(),
            enrolled_courses: Vec::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.info.id
    }

    pub fn full_name(&self) -> &str {
        &self.info.full_name
    }

    pub fn email(&self) -> &str {
        &self.info.email
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.info.date_of_birth
    }

    /// Case-insensitive registration number match.
    pub fn has_reg_no(&self, reg_no: &str) -> bool {
        eq_ignore_case(&self.reg_no, reg_no)
    }

    /// Courses in enrollment order.
    pub fn enrolled_courses(&self) -> &[SharedCourse] {
        &self.enrolled_courses
    }

    /// Membership is decided by course code equality.
    pub fn is_enrolled_in(&self, course: &Course) -> bool {
        self.enrolled_courses
            .iter()
            .any(|enrolled| enrolled.as_ref() == course)
    }

    /// Whether any enrolled course carries `code`, ignoring case.
    pub fn is_enrolled_in_code(&self, code: &str) -> bool {
        self.enrolled_courses
            .iter()
            .any(|enrolled| enrolled.has_code(code))
    }

    /// Total credits already taken in `semester`.
    pub fn credits_in(&self, semester: Semester) -> u32 {
        self.enrolled_courses
            .iter()
            .filter(|course| course.semester() == semester)
            .map(|course| course.credits())
            .sum()
    }

    /// Append `course` unless an equal course is already present.
    ///
    /// Returns `false` when the course was already in the set. Business rules
    /// (credit limits, duplicate reporting) live in the enrollment service.
    pub fn enroll_in(&mut self, course: SharedCourse) -> bool {
        if self.is_enrolled_in(&course) {
            return false;
        }
        self.enrolled_courses.push(course);
        true
    }

    /// Remove `course` if present, returning whether anything changed.
    pub fn unenroll_from(&mut self, course: &Course) -> bool {
        let before = self.enrolled_courses.len();
        self.enrolled_courses
            .retain(|enrolled| enrolled.as_ref() != course);
        before != self.enrolled_courses.len()
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.info.same_person(&other.info)
    }
}

impl Eq for Student {}

impl Profile for Student {
    fn profile(&self) -> String {
        format!(
            "Student Profile:\nID: {}\nRegNo: {}\nName: {}\nStatus: {}",
            self.info.id, self.reg_no, self.info.full_name, self.status
        )
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} · {}", self.reg_no, self.info.full_name)
    }
}

/// Teaching staff member. Instructors never enroll in courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(flatten)]
    pub info: PersonInfo,
    pub department: String,
    /// Academic title, e.g. `Professor` or `Lecturer`.
    pub title: String,
}

impl Instructor {
    pub fn new(info: PersonInfo, department: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            info,
            department: department.into(),
            title: title.into(),
        }
    }
}

impl PartialEq for Instructor {
    fn eq(&self, other: &Self) -> bool {
        self.info.same_person(&other.info)
    }
}

impl Eq for Instructor {}

impl Profile for Instructor {
    fn profile(&self) -> String {
        format!(
            "Instructor Profile:\nID: {}\nName: {} ({})\nDepartment: {}",
            self.info.id, self.info.full_name, self.title, self.department
        )
    }
}

/// Any person on record.
#[derive(Debug, Clone)]
pub enum Person {
    Student(Student),
    Instructor(Instructor),
}

impl Person {
    /// Common fields regardless of variant.
    pub fn info(&self) -> &PersonInfo {
        match self {
            Self::Student(student) => &student.info,
            Self::Instructor(instructor) => &instructor.info,
        }
    }

    /// Identity check across variants on the `(id, email)` key.
    pub fn same_person(&self, other: &Person) -> bool {
        self.info().same_person(other.info())
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.same_person(other)
    }
}

impl Profile for Person {
    fn profile(&self) -> String {
        match self {
            Self::Student(student) => student.profile(),
            Self::Instructor(instructor) => instructor.profile(),
        }
    }
}

impl From<Student> for Person {
    fn from(value: Student) -> Self {
        Self::Student(value)
    }
}

impl From<Instructor> for Person {
    fn from(value: Instructor) -> Self {
        Self::Instructor(value)
    }
}
