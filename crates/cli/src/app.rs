use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use ccrm_core::{
    backup::{bytes_to_megabytes, directory_size},
    AppConfig, BackupService, Course, DataPersistence, EnrollmentService, Instructor,
    PersonInfo, Profile, RecordStore, Student,
};
use crossterm::style::Stylize;
use thiserror::Error;
use tracing::debug;

use crate::input::{
    optional_text, parse_choice, parse_credits, parse_date, parse_id, parse_semester,
};

/// Raised when the input stream ends; the app treats it like choosing Exit.
#[derive(Debug, Error)]
#[error("input closed")]
struct InputClosed;

/// Numbered-menu frontend over the record store.
pub struct CcrmApp<R, W> {
    input: R,
    output: W,
    config: AppConfig,
    store: RecordStore,
    enrollment: EnrollmentService,
    persistence: DataPersistence,
    backup: BackupService,
}

impl<R: BufRead, W: Write> CcrmApp<R, W> {
    pub fn new(config: AppConfig, store: RecordStore, input: R, output: W) -> Self {
        let persistence = DataPersistence::new(&config.data_dir);
        let backup = BackupService::new(&config.data_dir, &config.backup_dir);
        Self {
            input,
            output,
            enrollment: EnrollmentService::new(store.clone()),
            store,
            persistence,
            backup,
            config,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_main_menu()?;
            let line = match self.read_line() {
                Ok(line) => line,
                Err(err) if err.is::<InputClosed>() => break,
                Err(err) => return Err(err),
            };

            let outcome = match parse_choice(&line) {
                Some(1) => self.manage_students(),
                Some(2) => self.manage_courses(),
                Some(3) => self.manage_enrollments(),
                Some(4) => self.export_data(),
                Some(5) => self.import_data(),
                Some(6) => self.perform_backup(),
                Some(7) => self.show_backup_size(),
                Some(0) => break,
                _ => self.invalid_choice(),
            };

            if let Err(err) = outcome {
                if err.is::<InputClosed>() {
                    break;
                }
                debug!("menu action failed: {err:#}");
                writeln!(self.output, "{}", format!("Error: {err:#}").red())?;
            }
        }

        writeln!(self.output, "Thank you for using CCRM. Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn print_main_menu(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "\n{}",
            "--- Campus Course & Records Manager ---".bold().cyan()
        )?;
        for line in [
            "1. Manage Students",
            "2. Manage Courses",
            "3. Manage Enrollments",
            "4. Export Data",
            "5. Import Data",
            "6. Perform Backup",
            "7. Show Total Backup Size",
            "0. Exit",
        ] {
            writeln!(self.output, "{line}")?;
        }
        write!(self.output, "Enter your choice: ")?;
        Ok(())
    }

    fn print_submenu(&mut self, title: &str, options: &[&str]) -> Result<()> {
        writeln!(self.output, "\n{}", format!("--- {title} ---").bold())?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {option}", index + 1)?;
        }
        writeln!(self.output, "0. Back to Main Menu")?;
        write!(self.output, "Enter your choice: ")?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}: ")?;
        self.read_line()
    }

    fn prompt_required(&mut self, label: &str) -> Result<String> {
        let value = self.prompt(label)?;
        if value.is_empty() {
            bail!("a value is required");
        }
        Ok(value)
    }

    fn invalid_choice(&mut self) -> Result<()> {
        writeln!(self.output, "{}", "Invalid choice. Please try again.".yellow())?;
        Ok(())
    }

    // Students

    fn manage_students(&mut self) -> Result<()> {
        self.print_submenu(
            "Student Management",
            &[
                "Add New Student",
                "List All Students",
                "Find Student by Registration Number",
            ],
        )?;
        match parse_choice(&self.read_line()?) {
            Some(1) => self.add_student(),
            Some(2) => self.list_students(),
            Some(3) => self.find_student(),
            Some(0) => Ok(()),
            _ => self.invalid_choice(),
        }
    }

    fn add_student(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "--- Add New Student ---".bold())?;
        let id = parse_id(&self.prompt("Enter ID (integer)")?)?;
        let full_name = self.prompt_required("Enter Full Name")?;
        let email = self.prompt_required("Enter Email")?;
        let date_of_birth = parse_date(&self.prompt("Enter Date of Birth (YYYY-MM-DD)")?)?;
        let reg_no = self.prompt_required("Enter Registration Number (e.g., S001)")?;

        if self.store.find_student(&reg_no).is_some() {
            writeln!(
                self.output,
                "{}",
                format!("Warning: registration number {reg_no} is already in use; lookups return the first match.")
                    .yellow()
            )?;
        }
        self.store
            .add_student(Student::new(id, full_name, email, date_of_birth, reg_no));
        writeln!(self.output, "{}", "Student added successfully!".green())?;
        Ok(())
    }

    fn list_students(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "--- List of All Students ---".bold())?;
        let students = self.store.all_students();
        if students.is_empty() {
            writeln!(self.output, "No students found.")?;
        }
        for student in students {
            writeln!(self.output, "{}\n", student.profile())?;
        }
        Ok(())
    }

    fn find_student(&mut self) -> Result<()> {
        let reg_no = self.prompt("Enter Registration Number to find")?;
        match self.store.find_student(&reg_no) {
            Some(student) => writeln!(self.output, "{}", student.profile())?,
            None => writeln!(
                self.output,
                "Student not found with Registration Number: {reg_no}"
            )?,
        }
        Ok(())
    }

    // Courses

    fn manage_courses(&mut self) -> Result<()> {
        self.print_submenu(
            "Course Management",
            &["Add New Course", "List All Courses", "Assign Instructor"],
        )?;
        match parse_choice(&self.read_line()?) {
            Some(1) => self.add_course(),
            Some(2) => self.list_courses(),
            Some(3) => self.assign_instructor(),
            Some(0) => Ok(()),
            _ => self.invalid_choice(),
        }
    }

    fn add_course(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "--- Add New Course ---".bold())?;
        let code = self.prompt_required("Enter Course Code (e.g., CS101)")?;
        let title = self.prompt_required("Enter Course Title")?;
        let credits = parse_credits(&self.prompt("Enter Credits (integer)")?)?;
        let department = optional_text(&self.prompt("Enter Department (blank for General)")?);
        let semester = parse_semester(&self.prompt("Enter Semester (Fall/Spring/Summer, blank for Fall)")?)?;

        let mut builder = Course::builder(code.as_str(), title).credits(credits);
        if let Some(department) = department {
            builder = builder.department(department);
        }
        if let Some(semester) = semester {
            builder = builder.semester(semester);
        }

        if self.store.find_course(&code).is_some() {
            writeln!(
                self.output,
                "{}",
                format!("Warning: course code {code} is already in use; lookups return the first match.")
                    .yellow()
            )?;
        }
        self.store.add_course(builder.build());
        writeln!(self.output, "{}", "Course added successfully!".green())?;
        Ok(())
    }

    fn list_courses(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "--- List of All Courses ---".bold())?;
        let courses = self.store.all_courses();
        if courses.is_empty() {
            writeln!(self.output, "No courses found.")?;
        }
        for course in courses {
            writeln!(self.output, "{course}")?;
            writeln!(self.output, "  Department: {}", course.department())?;
            if let Some(instructor) = course.instructor() {
                writeln!(
                    self.output,
                    "  Instructor: {} ({})",
                    instructor.info.full_name, instructor.title
                )?;
            }
        }
        Ok(())
    }

    fn assign_instructor(&mut self) -> Result<()> {
        let code = self.prompt("Enter Course Code")?;
        let Some(course) = self.store.find_course(&code) else {
            bail!("no course with code {code}");
        };

        let id = parse_id(&self.prompt("Enter Instructor ID (integer)")?)?;
        let full_name = self.prompt_required("Enter Full Name")?;
        let email = self.prompt_required("Enter Email")?;
        let date_of_birth = parse_date(&self.prompt("Enter Date of Birth (YYYY-MM-DD)")?)?;
        let department = self.prompt_required("Enter Department")?;
        let title = self.prompt_required("Enter Title (e.g., Professor)")?;

        let instructor = Instructor::new(
            PersonInfo::new(id, full_name, email, date_of_birth),
            department,
            title,
        );
        writeln!(
            self.output,
            "{}",
            format!(
                "Assigned {} to {}.",
                instructor.info.full_name,
                course.code()
            )
            .green()
        )?;
        course.set_instructor(Some(instructor));
        Ok(())
    }

    // Enrollments

    fn manage_enrollments(&mut self) -> Result<()> {
        self.print_submenu(
            "Enrollment Management",
            &[
                "Enroll Student in a Course",
                "Unenroll Student from a Course",
                "View a Student's Enrolled Courses",
                "List Students Enrolled in a Course",
            ],
        )?;
        match parse_choice(&self.read_line()?) {
            Some(1) => self.enroll_student(),
            Some(2) => self.unenroll_student(),
            Some(3) => self.view_student_courses(),
            Some(4) => self.view_course_students(),
            Some(0) => Ok(()),
            _ => self.invalid_choice(),
        }
    }

    fn enroll_student(&mut self) -> Result<()> {
        let reg_no = self.prompt("Enter Student Registration Number")?;
        let code = self.prompt("Enter Course Code")?;
        match self.enrollment.enroll_by_keys(&reg_no, &code) {
            Ok(()) => writeln!(self.output, "{}", "Enrollment successful!".green())?,
            Err(err) => writeln!(
                self.output,
                "{}",
                format!("Enrollment failed: {err}").red()
            )?,
        }
        Ok(())
    }

    fn unenroll_student(&mut self) -> Result<()> {
        let reg_no = self.prompt("Enter Student Registration Number")?;
        let code = self.prompt("Enter Course Code")?;
        match self.enrollment.unenroll_by_keys(&reg_no, &code) {
            Ok(()) => writeln!(self.output, "{}", "Unenrollment successful!".green())?,
            Err(err) => writeln!(
                self.output,
                "{}",
                format!("Unenrollment failed: {err}").red()
            )?,
        }
        Ok(())
    }

    fn view_student_courses(&mut self) -> Result<()> {
        let reg_no = self.prompt("Enter Student Registration Number")?;
        writeln!(self.output, "\n--- Courses for {reg_no} ---")?;
        let courses = self.enrollment.courses_by_student(&reg_no);
        if courses.is_empty() {
            writeln!(self.output, "Student is not enrolled in any courses.")?;
        }
        for course in courses {
            writeln!(self.output, "{course}")?;
        }
        Ok(())
    }

    fn view_course_students(&mut self) -> Result<()> {
        let code = self.prompt("Enter Course Code")?;
        writeln!(self.output, "\n--- Students in {code} ---")?;
        let students = self.enrollment.students_by_course(&code);
        if students.is_empty() {
            writeln!(self.output, "No students are enrolled in {code}.")?;
        }
        for student in students {
            writeln!(self.output, "{student}")?;
        }
        Ok(())
    }

    // Data and backups

    fn export_data(&mut self) -> Result<()> {
        let students = self.store.all_students();
        let path = self
            .persistence
            .export_students(&students, &self.config.student_export_file)?;
        writeln!(
            self.output,
            "{}",
            format!("Exported {} students to {}", students.len(), path.display()).green()
        )?;

        let courses = self.store.all_courses();
        let path = self
            .persistence
            .export_courses(&courses, &self.config.course_export_file)?;
        writeln!(
            self.output,
            "{}",
            format!("Exported {} courses to {}", courses.len(), path.display()).green()
        )?;
        Ok(())
    }

    fn import_data(&mut self) -> Result<()> {
        let students = self
            .persistence
            .import_students(&self.config.student_export_file)?;
        if students.is_empty() {
            writeln!(self.output, "No students imported.")?;
        } else {
            let count = students.len();
            self.store.replace_students(students);
            writeln!(self.output, "{}", format!("Imported {count} students.").green())?;
        }

        let courses = self
            .persistence
            .import_courses(&self.config.course_export_file)?;
        if !courses.is_empty() {
            let count = courses.len();
            self.store.replace_courses(courses);
            writeln!(self.output, "{}", format!("Imported {count} courses.").green())?;
        }
        Ok(())
    }

    fn perform_backup(&mut self) -> Result<()> {
        match self.backup.perform_backup()? {
            None => writeln!(
                self.output,
                "Data directory does not exist. Nothing to back up."
            )?,
            Some(report) => {
                for (path, reason) in &report.failures {
                    writeln!(
                        self.output,
                        "{}",
                        format!("Failed to copy {}: {reason}", path.display()).yellow()
                    )?;
                }
                writeln!(
                    self.output,
                    "{}",
                    format!(
                        "Backup completed to {} ({} files)",
                        report.directory.display(),
                        report.copied.len()
                    )
                    .green()
                )?;
            }
        }
        Ok(())
    }

    fn show_backup_size(&mut self) -> Result<()> {
        match directory_size(self.backup.destination_root()) {
            Ok(bytes) => writeln!(
                self.output,
                "Total size of all backups: {:.2} MB",
                bytes_to_megabytes(bytes)
            )?,
            Err(err) => writeln!(
                self.output,
                "{}",
                format!("Could not calculate backup size: {err}").red()
            )?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::seed::seed_demo_data;
    use tempfile::{tempdir, TempDir};

    fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            data_dir: dir.path().join("data"),
            backup_dir: dir.path().join("backup"),
            seed_demo_data: false,
            ..AppConfig::default()
        }
    }

    fn run_script(config: AppConfig, store: &RecordStore, script: &str) -> Result<String> {
        let mut app = CcrmApp::new(config, store.clone(), script.as_bytes(), Vec::new());
        app.run()?;
        Ok(String::from_utf8(app.into_output())?)
    }

    #[test]
    fn exit_and_end_of_input_both_say_goodbye() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        assert!(run_script(test_config(&dir), &store, "0\n")?.contains("Goodbye"));
        assert!(run_script(test_config(&dir), &store, "")?.contains("Goodbye"));
        Ok(())
    }

    #[test]
    fn unknown_choices_are_reported() -> Result<()> {
        let dir = tempdir()?;
        let output = run_script(test_config(&dir), &RecordStore::new(), "9\nabc\n0\n")?;
        assert_eq!(output.matches("Invalid choice").count(), 2);
        Ok(())
    }

    #[test]
    fn adds_and_finds_a_student() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        let output = run_script(
            test_config(&dir),
            &store,
            "1\n1\n7\nBob Stone\nbob@example.com\n2001-03-14\nS002\n1\n3\ns002\n0\n",
        )?;

        assert!(output.contains("Student added successfully!"));
        assert!(output.contains("RegNo: S002"));
        let bob = store.find_student("S002").context("student stored")?;
        assert_eq!(bob.id(), 7);
        Ok(())
    }

    #[test]
    fn malformed_student_input_aborts_only_that_action() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        let output = run_script(
            test_config(&dir),
            &store,
            "1\n1\nseven\n1\n1\n8\nCara\ncara@x.com\n20-01-2000\n1\n2\n0\n",
        )?;

        assert_eq!(output.matches("Error:").count(), 2);
        assert!(output.contains("No students found."));
        assert_eq!(store.student_count(), 0);
        Ok(())
    }

    #[test]
    fn adds_course_with_builder_defaults() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        let output = run_script(
            test_config(&dir),
            &store,
            "2\n1\nPH100\nPhysics I\n5\n\n\n2\n2\n0\n",
        )?;

        assert!(output.contains("Course added successfully!"));
        assert!(output.contains("PH100 · Physics I (5 credits, Fall)"));
        assert!(output.contains("Department: General"));
        let course = store.find_course("PH100").context("course stored")?;
        assert_eq!(course.department(), "General");
        Ok(())
    }

    #[test]
    fn zero_credit_course_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        let output = run_script(test_config(&dir), &store, "2\n1\nX1\nNothing\n0\n0\n")?;
        assert!(output.contains("credits must be greater than zero"));
        assert_eq!(store.course_count(), 0);
        Ok(())
    }

    #[test]
    fn assigns_instructor_to_existing_course() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        store.add_course(Course::builder("MA201", "Calculus").build());
        let output = run_script(
            test_config(&dir),
            &store,
            "2\n3\nma201\n202\nDr. Ada Byron\nada@example.com\n1980-12-10\nMathematics\nLecturer\n2\n2\n0\n",
        )?;

        assert!(output.contains("Assigned Dr. Ada Byron to MA201."));
        assert!(output.contains("Instructor: Dr. Ada Byron (Lecturer)"));
        Ok(())
    }

    #[test]
    fn enrollment_menu_reports_rule_violations() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        seed_demo_data(&store)?;
        let output = run_script(
            test_config(&dir),
            &store,
            "3\n1\nS001\nCS101\n3\n1\ns001\ncs101\n3\n1\nS404\nCS101\n3\n3\nS001\n3\n4\nCS101\n0\n",
        )?;

        assert!(output.contains("Enrollment successful!"));
        assert!(output.contains("Enrollment failed: student S001 is already enrolled in course CS101"));
        assert!(output.contains("Enrollment failed: no student with registration number S404"));
        assert!(output.contains("CS101 · Intro to Programming (4 credits, Fall)"));
        assert!(output.contains("S001 · Alice Johnson"));
        Ok(())
    }

    #[test]
    fn unenroll_via_menu() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        seed_demo_data(&store)?;
        let output = run_script(
            test_config(&dir),
            &store,
            "3\n1\nS001\nCS101\n3\n2\nS001\nCS101\n3\n3\nS001\n0\n",
        )?;

        assert!(output.contains("Unenrollment successful!"));
        assert!(output.contains("Student is not enrolled in any courses."));
        Ok(())
    }

    #[test]
    fn export_then_import_replaces_store_contents() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(&dir);
        let store = RecordStore::new();
        seed_demo_data(&store)?;

        let output = run_script(config.clone(), &store, "4\n")?;
        assert!(output.contains("Exported 1 students"));
        assert!(config.student_export_path().exists());

        store.students().clear();
        store.courses().clear();
        let output = run_script(config, &store, "5\n0\n")?;
        assert!(output.contains("Imported 1 students."));
        assert!(output.contains("Imported 1 courses."));
        assert_eq!(
            store.find_student("S001").map(|s| s.full_name().to_string()),
            Some("Alice Johnson".to_string())
        );
        assert!(store.find_course("CS101").is_some());
        Ok(())
    }

    #[test]
    fn import_without_file_keeps_existing_students() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordStore::new();
        seed_demo_data(&store)?;
        let output = run_script(test_config(&dir), &store, "5\n0\n")?;
        assert!(output.contains("No students imported."));
        assert_eq!(store.student_count(), 1);
        Ok(())
    }

    #[test]
    fn backup_and_size_report() -> Result<()> {
        let dir = tempdir()?;
        let config = test_config(&dir);
        let store = RecordStore::new();
        seed_demo_data(&store)?;

        let output = run_script(config.clone(), &store, "7\n6\n4\n6\n7\n0\n")?;
        assert!(output.contains("Could not calculate backup size"));
        assert!(output.contains("Data directory does not exist. Nothing to back up."));
        assert!(output.contains("Backup completed to"));
        assert!(output.contains("Total size of all backups:"));

        let snapshots: Vec<_> = fs::read_dir(&config.backup_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].starts_with("backup_"));
        Ok(())
    }
}
