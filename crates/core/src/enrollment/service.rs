use tracing::info;

use crate::{
    models::{Course, SharedCourse, Student},
    store::RecordStore,
};

use super::error::EnrollmentError;

/// Credit ceiling per student per semester, inclusive.
pub const MAX_CREDITS_PER_SEMESTER: u32 = 18;

/// Applies enrollment rules against the records held by a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct EnrollmentService {
    store: RecordStore,
}

impl EnrollmentService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// The store this service reads and mutates.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Link `student` to `course`.
    ///
    /// Refuses duplicates and any enrollment that would push the student's
    /// credits for the course's semester above [`MAX_CREDITS_PER_SEMESTER`].
    /// Credits from other semesters are not counted. On refusal the student
    /// is left untouched.
    pub fn enroll(
        &self,
        student: &mut Student,
        course: &SharedCourse,
    ) -> Result<(), EnrollmentError> {
        if student.is_enrolled_in(course) {
            return Err(EnrollmentError::DuplicateEnrollment {
                reg_no: student.reg_no.clone(),
                course_code: course.code().to_string(),
            });
        }

        let current = student.credits_in(course.semester());
        if current.saturating_add(course.credits()) > MAX_CREDITS_PER_SEMESTER {
            return Err(EnrollmentError::MaxCreditExceeded {
                limit: MAX_CREDITS_PER_SEMESTER,
            });
        }

        student.enroll_in(SharedCourse::clone(course));
        info!(
            reg_no = %student.reg_no,
            course = %course.code(),
            "enrolled {} in {}",
            student.full_name(),
            course.title()
        );
        Ok(())
    }

    /// Remove `course` from the student's set. Absent courses are ignored.
    pub fn unenroll(&self, student: &mut Student, course: &Course) {
        let removed = student.unenroll_from(course);
        info!(
            reg_no = %student.reg_no,
            course = %course.code(),
            removed,
            "unenrolled {} from {}",
            student.full_name(),
            course.title()
        );
    }

    /// Enroll the stored student `reg_no` in the stored course `course_code`.
    ///
    /// Lookups and the rule checks run under a single write lock, so the
    /// check-then-insert sequence is atomic for every holder of the store.
    pub fn enroll_by_keys(&self, reg_no: &str, course_code: &str) -> Result<(), EnrollmentError> {
        let mut records = self.store.write();
        let course = records
            .course(course_code)
            .cloned()
            .ok_or_else(|| EnrollmentError::CourseNotFound(course_code.to_string()))?;
        let student = records
            .student_mut(reg_no)
            .ok_or_else(|| EnrollmentError::StudentNotFound(reg_no.to_string()))?;
        self.enroll(student, &course)
    }

    /// Unenroll the stored student `reg_no` from the stored course `course_code`.
    pub fn unenroll_by_keys(
        &self,
        reg_no: &str,
        course_code: &str,
    ) -> Result<(), EnrollmentError> {
        let mut records = self.store.write();
        let course = records
            .course(course_code)
            .cloned()
            .ok_or_else(|| EnrollmentError::CourseNotFound(course_code.to_string()))?;
        let student = records
            .student_mut(reg_no)
            .ok_or_else(|| EnrollmentError::StudentNotFound(reg_no.to_string()))?;
        self.unenroll(student, &course);
        Ok(())
    }

    /// Students enrolled in a course whose code matches `course_code`, ignoring case.
    pub fn students_by_course(&self, course_code: &str) -> Vec<Student> {
        self.store
            .read()
            .students
            .iter()
            .filter(|student| student.is_enrolled_in_code(course_code))
            .cloned()
            .collect()
    }

    /// Current roster of the first student matching `reg_no`, or empty.
    pub fn courses_by_student(&self, reg_no: &str) -> Vec<SharedCourse> {
        self.store
            .read()
            .student(reg_no)
            .map(|student| student.enrolled_courses().to_vec())
            .unwrap_or_default()
    }
}
