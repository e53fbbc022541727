// src/pipeline/normalize.rs

//! Record normalization: derives the human-readable `age` field.

use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::{AgeStyle, AnimalRecord};

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fill in `age` for every record, relative to `today`.
///
/// All ages are computed before any record is touched, so a malformed
/// birth date leaves the whole batch unchanged.
pub fn normalize(records: &mut [AnimalRecord], today: NaiveDate, style: AgeStyle) -> Result<()> {
    let ages = records
        .iter()
        .map(|record| birth_date(record).map(|birth| describe_age(birth, today, style)))
        .collect::<Result<Vec<_>>>()?;

    for (record, age) in records.iter_mut().zip(ages) {
        record.age = Some(age);
    }

    Ok(())
}

/// Parse a record's birth date.
pub fn birth_date(record: &AnimalRecord) -> Result<NaiveDate> {
    let raw = record
        .birth_date
        .as_deref()
        .ok_or_else(|| AppError::malformed(&record.id, "missing birth date"))?;

    NaiveDate::parse_from_str(raw.trim(), BIRTH_DATE_FORMAT).map_err(|e| {
        AppError::malformed(
            &record.id,
            format!("birth date '{}' is not YYYY-MM-DD: {}", raw, e),
        )
    })
}

/// Word the time elapsed between `birth` and `today`.
pub fn describe_age(birth: NaiveDate, today: NaiveDate, style: AgeStyle) -> String {
    match style {
        AgeStyle::Calendar => calendar_age(birth, today),
        AgeStyle::Legacy => legacy_age(birth, today),
    }
}

fn calendar_age(birth: NaiveDate, today: NaiveDate) -> String {
    let mut months = (today.year() - birth.year()) * 12 + today.month() as i32
        - birth.month() as i32;
    if today.day() < birth.day() {
        months -= 1;
    }

    if months <= 0 {
        return "under 1 month old".to_string();
    }

    let mut parts = Vec::with_capacity(2);
    let (years, months) = (months / 12, months % 12);
    if years > 0 {
        parts.push(plural(years, "year"));
    }
    if months > 0 {
        parts.push(plural(months, "month"));
    }

    format!("{} old", parts.join(" "))
}

// Year and month fields are subtracted independently; negative parts are dropped.
fn legacy_age(birth: NaiveDate, today: NaiveDate) -> String {
    let years = today.year() - birth.year();
    let years = if years > 0 {
        format!("{} ", plural(years, "year"))
    } else {
        String::new()
    };

    let months = today.month() as i32 - birth.month() as i32;
    let months = if months > 0 {
        plural(months, "month")
    } else {
        String::new()
    };

    format!("{}{} old", years, months)
}

fn plural(n: i32, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n > 1 { "s" } else { "" })
}
