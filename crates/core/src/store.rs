//! In-memory record store shared by every component of the application.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::models::{Course, SharedCourse, Student};

static INSTANCE: Lazy<RecordStore> = Lazy::new(RecordStore::new);

/// The complete record set: every student and every course, in insertion order.
///
/// Uniqueness of registration numbers and course codes is not enforced here;
/// lookups return the first match.
#[derive(Debug, Default)]
pub struct Records {
    /// Every student on record.
    pub students: Vec<Student>,
    /// Every course offered.
    pub courses: Vec<SharedCourse>,
}

impl Records {
    /// First student whose registration number matches, ignoring case.
    pub fn student(&self, reg_no: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.has_reg_no(reg_no))
    }

    /// Mutable access to the first student matching `reg_no`.
    pub fn student_mut(&mut self, reg_no: &str) -> Option<&mut Student> {
        self.students
            .iter_mut()
            .find(|student| student.has_reg_no(reg_no))
    }

    /// First course whose code matches, ignoring case.
    pub fn course(&self, code: &str) -> Option<&SharedCourse> {
        self.courses.iter().find(|course| course.has_code(code))
    }
}

/// Cheaply clonable handle onto a shared [`Records`] set.
///
/// Every clone observes and mutates the same collections.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    inner: Arc<RwLock<Records>>,
}

impl RecordStore {
    /// Create an independent, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the process-wide store, created empty on first access.
    pub fn instance() -> Self {
        INSTANCE.clone()
    }

    /// Shared view of the whole record set.
    pub fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.inner.read()
    }

    /// Exclusive view of the whole record set.
    ///
    /// Use this when touching students and courses together; holding the
    /// guard while calling any other method on the same store deadlocks.
    pub fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.inner.write()
    }

    /// Live student collection.
    pub fn students(&self) -> MappedRwLockWriteGuard<'_, Vec<Student>> {
        RwLockWriteGuard::map(self.inner.write(), |records| &mut records.students)
    }

    /// Live course collection.
    pub fn courses(&self) -> MappedRwLockWriteGuard<'_, Vec<SharedCourse>> {
        RwLockWriteGuard::map(self.inner.write(), |records| &mut records.courses)
    }

    /// Append a student to the store.
    pub fn add_student(&self, student: Student) {
        self.inner.write().students.push(student);
    }

    /// Store a freshly built course and return its shared handle.
    pub fn add_course(&self, course: Course) -> SharedCourse {
        let course = Arc::new(course);
        self.inner.write().courses.push(Arc::clone(&course));
        course
    }

    /// Snapshot of the first student with a matching registration number.
    pub fn find_student(&self, reg_no: &str) -> Option<Student> {
        self.inner.read().student(reg_no).cloned()
    }

    /// First course whose code matches `code`, ignoring case.
    pub fn find_course(&self, code: &str) -> Option<SharedCourse> {
        self.inner.read().course(code).cloned()
    }

    /// Snapshot of all students in store order.
    pub fn all_students(&self) -> Vec<Student> {
        self.inner.read().students.clone()
    }

    /// Shared handles to all courses in store order.
    pub fn all_courses(&self) -> Vec<SharedCourse> {
        self.inner.read().courses.clone()
    }

    /// Discard every student and install `students` in their place.
    pub fn replace_students(&self, students: Vec<Student>) {
        let mut inner = self.inner.write();
        debug!(
            previous = inner.students.len(),
            incoming = students.len(),
            "replacing student records"
        );
        inner.students = students;
    }

    /// Discard the course catalog and install `courses` in its place.
    ///
    /// Students keep the course handles they were enrolled with.
    pub fn replace_courses(&self, courses: Vec<Course>) {
        let mut inner = self.inner.write();
        debug!(
            previous = inner.courses.len(),
            incoming = courses.len(),
            "replacing course catalog"
        );
        inner.courses = courses.into_iter().map(Arc::new).collect();
    }

    /// Number of students held.
    pub fn student_count(&self) -> usize {
        self.inner.read().students.len()
    }

    /// Number of courses held.
    pub fn course_count(&self) -> usize {
        self.inner.read().courses.len()
    }
}
