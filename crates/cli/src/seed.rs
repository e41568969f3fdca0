//! Sample records loaded at startup when `seed_demo_data` is enabled.

use anyhow::{Context, Result};
use ccrm_core::{Course, Instructor, PersonInfo, RecordStore, Semester, Student};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid seed date {year}-{month}-{day}"))
}

/// Add one student and one course taught by a professor.
pub fn seed_demo_data(store: &RecordStore) -> Result<()> {
    let alice = Student::new(
        1,
        "Alice Johnson",
        "alice@example.com",
        date(2002, 5, 20)?,
        "S001",
    );
    let davis = Instructor::new(
        PersonInfo::new(
            101,
            "Prof. Robert Davis",
            "davis@example.com",
            date(1975, 11, 30)?,
        ),
        "Computer Science",
        "Professor",
    );
    let cs101 = Course::builder("CS101", "Intro to Programming")
        .credits(4)
        .department("Computer Science")
        .instructor(davis)
        .semester(Semester::Fall)
        .build();

    store.add_student(alice);
    store.add_course(cs101);
    Ok(())
}
