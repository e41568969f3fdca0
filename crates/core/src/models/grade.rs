use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Letter grade, ordered `S > A > B > C > D > E > F`.
///
/// Not used by any computation yet; kept for grade-point reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::S,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    /// Fixed grade point for the letter.
    pub fn grade_point(&self) -> f64 {
        match self {
            Self::S => 10.0,
            Self::A => 9.0,
            Self::B => 8.0,
            Self::C => 7.0,
            Self::D => 6.0,
            Self::E => 5.0,
            Self::F => 0.0,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::S => 6,
            Self::A => 5,
            Self::B => 4,
            Self::C => 3,
            Self::D => 2,
            Self::E => 1,
            Self::F => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }
}

impl PartialOrd for Grade {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Grade {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown grade '{0}'")]
pub struct ParseGradeError(String);

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseGradeError(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_points_are_fixed() {
        let points: Vec<f64> = Grade::ALL.iter().map(Grade::grade_point).collect();
        assert_eq!(points, [10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 0.0]);
    }

    #[test]
    fn ordering_puts_s_on_top() {
        assert!(Grade::S > Grade::A);
        assert!(Grade::E > Grade::F);
        assert_eq!(Grade::ALL.iter().max(), Some(&Grade::S));
        assert_eq!(Grade::ALL.iter().min(), Some(&Grade::F));
    }

    #[test]
    fn parses_single_letters() {
        assert_eq!("b".parse::<Grade>(), Ok(Grade::B));
        assert!("X".parse::<Grade>().is_err());
    }
}
