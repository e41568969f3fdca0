use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::Arc,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{eq_ignore_case, Instructor};

/// Default credit weight for a course.
pub const DEFAULT_CREDITS: u32 = 3;
/// Department assigned when none is configured.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Course handle shared between the store and every student enrolled in it.
pub type SharedCourse = Arc<Course>;

/// Academic term a course runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    #[default]
    Fall,
    Spring,
    Summer,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::Fall, Semester::Spring, Semester::Summer];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fall => "Fall",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown semester '{0}' (expected Fall, Spring or Summer)")]
pub struct ParseSemesterError(String);

impl FromStr for Semester {
    type Err = ParseSemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|semester| eq_ignore_case(semester.display_name(), needle))
            .ok_or_else(|| ParseSemesterError(needle.to_string()))
    }
}

/// A course offering.
///
/// Equality and hashing consider the code only. Everything except the
/// assigned instructor is fixed once [`CourseBuilder::build`] returns; the
/// instructor can be (re)assigned through any shared handle.
#[derive(Debug)]
pub struct Course {
    code: String,
    title: String,
    credits: u32,
    department: String,
    instructor: RwLock<Option<Instructor>>,
    semester: Semester,
}

impl Course {
    /// Start building a course; code and title are mandatory.
    pub fn builder(code: impl Into<String>, title: impl Into<String>) -> CourseBuilder {
        CourseBuilder::new(code, title)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }

    /// Snapshot of the currently assigned instructor.
    pub fn instructor(&self) -> Option<Instructor> {
        self.instructor.read().clone()
    }

    /// Assign, replace or clear the instructor.
    pub fn set_instructor(&self, instructor: Option<Instructor>) {
        *self.instructor.write() = instructor;
    }

    /// Case-insensitive code match, used for lookups by user input.
    pub fn has_code(&self, code: &str) -> bool {
        eq_ignore_case(&self.code, code)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} · {} ({} credits, {})",
            self.code, self.title, self.credits, self.semester
        )
    }
}

/// Fluent constructor and the single place course defaults are decided.
#[derive(Debug, Clone)]
pub struct CourseBuilder {
    code: String,
    title: String,
    credits: u32,
    department: String,
    instructor: Option<Instructor>,
    semester: Semester,
}

impl CourseBuilder {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credits: DEFAULT_CREDITS,
            department: DEFAULT_DEPARTMENT.to_string(),
            instructor: None,
            semester: Semester::default(),
        }
    }

    pub fn credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn instructor(mut self, instructor: Instructor) -> Self {
        self.instructor = Some(instructor);
        self
    }

    pub fn semester(mut self, semester: Semester) -> Self {
        self.semester = semester;
        self
    }

    pub fn build(self) -> Course {
        Course {
            code: self.code,
            title: self.title,
            credits: self.credits,
            department: self.department,
            instructor: RwLock::new(self.instructor),
            semester: self.semester,
        }
    }
}
