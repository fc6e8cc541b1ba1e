//! Temporal decomposition: date-like fields → year/month/day columns
//!
//! One parser serves training and inference so the component
//! distributions match. Formats are tried in a fixed order; a value
//! matching none of them is a typed failure, never a guessed date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::schema::{FieldRole, RawValue, SchemaRegistry};

use super::frame::Frame;
use super::{EncodeError, Result};

/// Accepted textual formats, tried in order.
pub const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Accepted textual datetime formats, tried after the date-only ones.
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parse one raw cell into a calendar date. Numbers are epoch
/// milliseconds; text runs through the format lists.
pub fn parse_date(column: &str, value: &RawValue) -> Result<NaiveDate> {
    let fail = || EncodeError::DateParse {
        column: column.to_string(),
        value: value.canon().unwrap_or_else(|| "null".to_string()),
    };

    match value {
        RawValue::Number(ms) if ms.is_finite() && ms.fract() == 0.0 => {
            DateTime::from_timestamp_millis(*ms as i64)
                .map(|dt| dt.date_naive())
                .ok_or_else(fail)
        }
        RawValue::Text(s) => {
            let s = s.trim();
            // integer text is epoch milliseconds too
            if let Ok(ms) = s.parse::<i64>() {
                return DateTime::from_timestamp_millis(ms)
                    .map(|dt| dt.date_naive())
                    .ok_or_else(fail);
            }
            for fmt in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                    return Ok(date);
                }
            }
            for fmt in DATETIME_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Ok(dt.date());
                }
            }
            Err(fail())
        }
        _ => Err(fail()),
    }
}

/// Replace each datetime column with `{col}_year`, `{col}_month`,
/// `{col}_day` appended at the end of the frame, in registry order.
pub fn expand(frame: &mut Frame, registry: &SchemaRegistry) -> Result<()> {
    for name in registry.columns_with_role(FieldRole::Datetime) {
        let cells = frame.drop_col(name)?;
        let mut years = Vec::with_capacity(cells.len());
        let mut months = Vec::with_capacity(cells.len());
        let mut days = Vec::with_capacity(cells.len());
        for cell in &cells {
            let date = parse_date(name, cell)?;
            years.push(RawValue::Number(f64::from(date.year())));
            months.push(RawValue::Number(f64::from(date.month())));
            days.push(RawValue::Number(f64::from(date.day())));
        }
        frame.push_col(format!("{name}_year"), years);
        frame.push_col(format!("{name}_month"), months);
        frame.push_col(format!("{name}_day"), days);
    }
    Ok(())
}
