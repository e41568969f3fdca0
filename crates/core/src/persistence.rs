//! Flat-file export and import of store contents.
//!
//! Students travel as one comma-separated line each:
//! `id,regNo,fullName,email,dateOfBirth` with the date as `YYYY-MM-DD`.
//! The course catalog travels as pretty-printed JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Course, Instructor, Semester, SharedCourse, Student};

/// Number of fields in a student line.
pub const STUDENT_FIELDS: usize = 5;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a single student line was rejected during import.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordParseError {
    /// Fewer than five comma-separated fields.
    #[error("expected 5 fields, found {found}")]
    MissingFields {
        /// Number of fields present on the line.
        found: usize,
    },
    /// The id column is not a non-negative integer.
    #[error("invalid id '{value}'")]
    InvalidId {
        /// Raw column contents.
        value: String,
    },
    /// The date column is not `YYYY-MM-DD`.
    #[error("invalid date of birth '{value}'")]
    InvalidDate {
        /// Raw column contents.
        value: String,
    },
}

/// Serialized representation of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CourseRecord {
    code: String,
    title: String,
    credits: u32,
    department: String,
    #[serde(default)]
    semester: Semester,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instructor: Option<Instructor>,
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code().to_string(),
            title: course.title().to_string(),
            credits: course.credits(),
            department: course.department().to_string(),
            semester: course.semester(),
            instructor: course.instructor(),
        }
    }
}

impl From<CourseRecord> for Course {
    fn from(record: CourseRecord) -> Self {
        let mut builder = Course::builder(record.code, record.title)
            .credits(record.credits)
            .department(record.department)
            .semester(record.semester);
        if let Some(instructor) = record.instructor {
            builder = builder.instructor(instructor);
        }
        builder.build()
    }
}

/// Reads and writes record files inside a data directory.
#[derive(Debug, Clone)]
pub struct DataPersistence {
    root: PathBuf,
}

impl DataPersistence {
    /// Create an adapter rooted at `root`. The directory is created lazily on export.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory that export and import resolve file names against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one line per student to `file_name`, replacing any previous contents.
    pub fn export_students(&self, students: &[Student], file_name: &str) -> Result<PathBuf> {
        let path = self.root.join(file_name);
        let mut contents = String::new();
        for student in students {
            contents.push_str(&format_student_line(student));
            contents.push('\n');
        }
        self.write_file(&path, contents.as_bytes())?;
        info!(
            count = students.len(),
            "exported students to {}",
            path.display()
        );
        Ok(path)
    }

    /// Read students back from `file_name`.
    ///
    /// A missing file yields an empty list. Lines that cannot be parsed are
    /// logged and dropped; the remaining lines still load.
    pub fn import_students(&self, file_name: &str) -> Result<Vec<Student>> {
        let path = self.root.join(file_name);
        if !path.exists() {
            warn!("import file not found: {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut students = Vec::new();
        for (index, line) in content.lines().enumerate() {
            match parse_student_line(line) {
                Ok(student) => students.push(student),
                Err(err) => warn!(
                    "skipping line {} of {}: {err}",
                    index + 1,
                    path.display()
                ),
            }
        }

        info!(
            count = students.len(),
            "imported students from {}",
            path.display()
        );
        Ok(students)
    }

    /// Write the course catalog as JSON to `file_name`.
    pub fn export_courses(&self, courses: &[SharedCourse], file_name: &str) -> Result<PathBuf> {
        let path = self.root.join(file_name);
        let records: Vec<CourseRecord> = courses
            .iter()
            .map(|course| CourseRecord::from(course.as_ref()))
            .collect();
        let serialised =
            serde_json::to_vec_pretty(&records).context("failed to serialize course catalog")?;
        self.write_file(&path, &serialised)?;
        info!(
            count = records.len(),
            "exported courses to {}",
            path.display()
        );
        Ok(path)
    }

    /// Read a course catalog written by [`DataPersistence::export_courses`].
    ///
    /// A missing file yields an empty list; malformed JSON is an error.
    pub fn import_courses(&self, file_name: &str) -> Result<Vec<Course>> {
        let path = self.root.join(file_name);
        if !path.exists() {
            warn!("course catalog not found: {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records: Vec<CourseRecord> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(records.into_iter().map(Course::from).collect())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Render a student as `id,regNo,fullName,email,dateOfBirth`.
pub fn format_student_line(student: &Student) -> String {
    [
        student.id().to_string(),
        student.reg_no.clone(),
        student.full_name().to_string(),
        student.email().to_string(),
        student.date_of_birth().format(DATE_FORMAT).to_string(),
    ]
    .join(",")
}

/// Parse a single student line. Extra trailing fields are ignored.
///
/// Fields are taken verbatim so that padded names and emails survive an
/// export and import; only a trailing `\r` is stripped.
pub fn parse_student_line(line: &str) -> Result<Student, RecordParseError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < STUDENT_FIELDS {
        return Err(RecordParseError::MissingFields { found: parts.len() });
    }

    let id = parts[0]
        .parse::<i32>()
        .map_err(|_| RecordParseError::InvalidId {
            value: parts[0].to_string(),
        })?;
    let date_of_birth = NaiveDate::parse_from_str(parts[4], DATE_FORMAT).map_err(|_| {
        RecordParseError::InvalidDate {
            value: parts[4].to_string(),
        }
    })?;

    Ok(Student::new(id, parts[2], parts[3], date_of_birth, parts[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PersonInfo, StudentStatus};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn tuple(student: &Student) -> (i32, String, String, String, NaiveDate) {
        (
            student.id(),
            student.reg_no.clone(),
            student.full_name().to_string(),
            student.email().to_string(),
            student.date_of_birth(),
        )
    }

    #[test]
    fn export_then_import_preserves_student_fields() -> Result<()> {
        let dir = tempdir()?;
        let persistence = DataPersistence::new(dir.path().join("data"));
        let students = vec![
            Student::new(1, "Alice Johnson", "alice@example.com", date(2002, 5, 20), "S001"),
            Student::new(2, "Bob Stone", "bob@example.com", date(2001, 3, 14), "S002"),
        ];

        let path = persistence.export_students(&students, "students.csv")?;
        assert!(path.exists());
        assert_eq!(
            fs::read_to_string(&path)?,
            "1,S001,Alice Johnson,alice@example.com,2002-05-20\n\
             2,S002,Bob Stone,bob@example.com,2001-03-14\n"
        );

        let imported = persistence.import_students("students.csv")?;
        let mut expected: Vec<_> = students.iter().map(tuple).collect();
        let mut actual: Vec<_> = imported.iter().map(tuple).collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
        assert!(imported
            .iter()
            .all(|s| s.status == StudentStatus::Active && s.enrolled_courses().is_empty()));
        Ok(())
    }

    #[test]
    fn export_truncates_previous_contents() -> Result<()> {
        let dir = tempdir()?;
        let persistence = DataPersistence::new(dir.path());
        let alice = Student::new(1, "Alice", "alice@x.com", date(2002, 5, 20), "S001");

        persistence.export_students(&[alice.clone(), alice.clone()], "s.csv")?;
        persistence.export_students(&[alice], "s.csv")?;
        assert_eq!(persistence.import_students("s.csv")?.len(), 1);
        Ok(())
    }

    #[test]
    fn malformed_lines_are_dropped() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("students.csv"),
            "1,S001,Alice,alice@x.com,2002-05-20\n2,S002\n",
        )?;
        let persistence = DataPersistence::new(dir.path());

        let imported = persistence.import_students("students.csv")?;
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].id(), 1);
        assert_eq!(imported[0].reg_no, "S001");
        Ok(())
    }

    #[test]
    fn missing_import_file_yields_empty_batch() -> Result<()> {
        let dir = tempdir()?;
        let persistence = DataPersistence::new(dir.path().join("absent"));
        assert!(persistence.import_students("students.csv")?.is_empty());
        assert!(persistence.import_courses("courses.json")?.is_empty());
        Ok(())
    }

    #[test]
    fn parse_reports_each_failure_kind() {
        assert_eq!(
            parse_student_line("2,S002").unwrap_err(),
            RecordParseError::MissingFields { found: 2 }
        );
        assert_eq!(
            parse_student_line("x,S002,Bob,bob@x.com,2001-03-14").unwrap_err(),
            RecordParseError::InvalidId {
                value: "x".to_string()
            }
        );
        assert_eq!(
            parse_student_line("2,S002,Bob,bob@x.com,14/03/2001").unwrap_err(),
            RecordParseError::InvalidDate {
                value: "14/03/2001".to_string()
            }
        );
        assert!(parse_student_line("").is_err());
    }

    #[test]
    fn parse_keeps_fields_verbatim_and_ignores_extras() {
        let student =
            parse_student_line("3,S003, Cara ,cara@x.com ,2000-01-02,extra\r").expect("parses");
        assert_eq!(student.id(), 3);
        assert_eq!(student.reg_no, "S003");
        assert_eq!(student.full_name(), " Cara ");
        assert_eq!(student.email(), "cara@x.com ");
        assert_eq!(student.date_of_birth(), date(2000, 1, 2));

        let crlf = parse_student_line("4,S004,Dan,dan@x.com,2001-02-03\r").expect("parses");
        assert_eq!(crlf.date_of_birth(), date(2001, 2, 3));
    }

    #[test]
    fn padded_ids_are_rejected_and_negative_ids_accepted() {
        assert_eq!(
            parse_student_line(" 3 ,S003,Cara,cara@x.com,2000-01-02").unwrap_err(),
            RecordParseError::InvalidId {
                value: " 3 ".to_string()
            }
        );
        let student = parse_student_line("-1,S009,Neg,n@x.com,2000-01-01").expect("parses");
        assert_eq!(student.id(), -1);
    }

    #[test]
    fn padded_names_and_emails_survive_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let persistence = DataPersistence::new(dir.path());
        let students = vec![Student::new(
            1,
            " Alice ",
            "alice@x.com ",
            date(2002, 5, 20),
            "S001",
        )];

        persistence.export_students(&students, "students.csv")?;
        let imported = persistence.import_students("students.csv")?;

        assert_eq!(imported.len(), 1);
        assert_eq!(tuple(&imported[0]), tuple(&students[0]));
        Ok(())
    }

    #[test]
    fn course_catalog_round_trips_through_json() -> Result<()> {
        let dir = tempdir()?;
        let persistence = DataPersistence::new(dir.path());
        let davis = Instructor::new(
            PersonInfo::new(101, "Prof. Robert Davis", "davis@example.com", date(1975, 11, 30)),
            "Computer Science",
            "Professor",
        );
        let courses = vec![
            Arc::new(
                Course::builder("CS101", "Intro to Programming")
                    .credits(4)
                    .department("Computer Science")
                    .instructor(davis)
                    .build(),
            ),
            Arc::new(
                Course::builder("MA201", "Calculus")
                    .semester(Semester::Spring)
                    .build(),
            ),
        ];

        persistence.export_courses(&courses, "courses.json")?;
        let imported = persistence.import_courses("courses.json")?;

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].code(), "CS101");
        assert_eq!(imported[0].credits(), 4);
        assert_eq!(
            imported[0].instructor().map(|i| i.info.full_name),
            Some("Prof. Robert Davis".to_string())
        );
        assert_eq!(imported[1].semester(), Semester::Spring);
        assert_eq!(imported[1].department(), "General");
        assert!(imported[1].instructor().is_none());
        Ok(())
    }

    #[test]
    fn malformed_catalog_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("courses.json"), "{ not json")?;
        let persistence = DataPersistence::new(dir.path());
        assert!(persistence.import_courses("courses.json").is_err());
        Ok(())
    }
}
