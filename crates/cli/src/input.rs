//! Parsing of values typed at the prompt.

use anyhow::{bail, Context, Result};
use ccrm_core::Semester;
use chrono::NaiveDate;

pub fn parse_id(raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .with_context(|| format!("'{}' is not a valid id", raw.trim()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a date in YYYY-MM-DD form", raw.trim()))
}

/// Credits must be a positive integer.
pub fn parse_credits(raw: &str) -> Result<u32> {
    let credits: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number of credits", raw.trim()))?;
    if credits == 0 {
        bail!("credits must be greater than zero");
    }
    Ok(credits)
}

/// Blank input means "use the default".
pub fn parse_semester(raw: &str) -> Result<Option<Semester>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.parse::<Semester>()?))
}

/// Blank input means "use the default".
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Non-numeric menu input maps to `None` (treated as an invalid choice).
pub fn parse_choice(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_signed_integers() {
        assert_eq!(parse_id(" 42 ").ok(), Some(42));
        assert_eq!(parse_id("-1").ok(), Some(-1));
        assert!(parse_id("abc").is_err());
        assert!(parse_id("4.5").is_err());
    }

    #[test]
    fn dates_use_iso_format() {
        assert_eq!(
            parse_date("2002-05-20").ok(),
            NaiveDate::from_ymd_opt(2002, 5, 20)
        );
        assert!(parse_date("20/05/2002").is_err());
        assert!(parse_date("2002-02-30").is_err());
    }

    #[test]
    fn credits_must_be_positive() {
        assert_eq!(parse_credits("4").ok(), Some(4));
        assert!(parse_credits("0").is_err());
        assert!(parse_credits("four").is_err());
    }

    #[test]
    fn blank_semester_uses_default() {
        assert_eq!(parse_semester("").ok(), Some(None));
        assert_eq!(parse_semester("spring").ok(), Some(Some(Semester::Spring)));
        assert!(parse_semester("winter").is_err());
    }

    #[test]
    fn menu_choices() {
        assert_eq!(parse_choice("3\n"), Some(3));
        assert_eq!(parse_choice("x"), None);
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" Physics "), Some("Physics".to_string()));
    }
}
