//! Field-level checks shared by the CSV reconciliation and the CRUD handlers.

use chrono::{Datelike, Months, NaiveDate};
use common::model::student::StudentProfile;
use regex::Regex;
use std::sync::OnceLock;

fn roll_number_regex() -> &'static Regex {
    static ROLL_NUMBER: OnceLock<Regex> = OnceLock::new();
    ROLL_NUMBER.get_or_init(|| Regex::new(r"^[0-9]{3}[A-Z]{1}[0-9]{4}$").expect("valid pattern"))
}

/// Roll numbers are three digits, one uppercase letter, four digits.
pub fn validate_roll_number(roll_number: &str) -> Result<(), String> {
    if roll_number_regex().is_match(roll_number) {
        Ok(())
    } else {
        Err(format!(
            "Roll number \"{}\" must be in the format 123A1234 (3 digits, 1 uppercase letter, 4 digits)",
            roll_number
        ))
    }
}

pub fn validate_email(email: &str, suffix: &str) -> Result<(), String> {
    if !email.ends_with(suffix) {
        return Err(format!("Email must end with {}", suffix));
    }
    let username = email.split('@').next().unwrap_or_default();
    if username.chars().count() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }
    Ok(())
}

/// Date of birth: `YYYY-MM-DD`, not in the future, not before 1900, at
/// least eighteen years before `today`.
pub fn validate_dob(dob: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
        .map_err(|_| "Enter your date of birth in the format YYYY-MM-DD".to_string())?;
    if date > today {
        return Err("Date of birth cannot be in the future.".to_string());
    }
    if date.year() < 1900 {
        return Err("Year of birth cannot be before 1900.".to_string());
    }
    let adult_cutoff = today
        .checked_sub_months(Months::new(18 * 12))
        .unwrap_or(NaiveDate::MIN);
    if date > adult_cutoff {
        return Err("You must be at least 18 years old.".to_string());
    }
    Ok(date)
}

pub fn validate_percentage(field: &str, value: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 0 and 100", field))
    }
}

/// Checks a self-submitted profile. All problems are returned, not just the first.
pub fn validate_profile(profile: &StudentProfile, today: NaiveDate) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if let Some(dob) = profile.dob.as_deref() {
        if let Err(e) = validate_dob(dob, today) {
            problems.push(e);
        }
    }

    let scores = [
        ("marks_10th", profile.marks_10th),
        ("marks_12th", profile.marks_12th),
        ("jee_score", profile.jee_score),
        ("cet_score", profile.cet_score),
    ];
    for (field, value) in scores {
        if let Some(value) = value {
            if let Err(e) = validate_percentage(field, value) {
                problems.push(e);
            }
        }
    }

    for (field, value) in [
        ("phone_no_student", &profile.phone_no_student),
        ("phone_no_mother", &profile.phone_no_mother),
        ("phone_no_father", &profile.phone_no_father),
    ] {
        if value.as_deref().is_some_and(|v| v.chars().count() > 12) {
            problems.push(format!("{} must be at most 12 characters", field));
        }
    }

    if profile.internship_status.requires_details() {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&profile.internship_company) {
            problems.push(
                "Company name is required when internship status is Shortlisted, Accepted, or Completed"
                    .to_string(),
            );
        }
        if blank(&profile.internship_role) {
            problems.push(
                "Role is required when internship status is Shortlisted, Accepted, or Completed"
                    .to_string(),
            );
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
