// src/filter/decode.rs
//! Per-value coercion rules shared by every filter shape.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{InvalidParameter, ParamCause};

/// An integer facet that may be left unspecified.
///
/// `Absent` means the caller did not filter on the facet, which is not the
/// same thing as `Present(0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum OptionalInt {
    #[default]
    Absent,
    Present(i64),
}

impl OptionalInt {
    pub fn is_present(&self) -> bool {
        matches!(self, OptionalInt::Present(_))
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            OptionalInt::Absent => None,
            OptionalInt::Present(v) => Some(*v),
        }
    }
}

impl From<Option<i64>> for OptionalInt {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(v) => OptionalInt::Present(v),
            None => OptionalInt::Absent,
        }
    }
}

impl From<OptionalInt> for Option<i64> {
    fn from(value: OptionalInt) -> Self {
        value.value()
    }
}

/// Calendar month used by the sales and dashboard filters (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn decode_scalar_optional_int(name: &str, value: &str) -> Result<OptionalInt, InvalidParameter> {
    if value.is_empty() {
        return Ok(OptionalInt::Absent);
    }

    value
        .parse::<i64>()
        .map(OptionalInt::Present)
        .map_err(|_| InvalidParameter::new(name, ParamCause::NotAnInteger(value.to_string())))
}

/// Element-wise [`decode_scalar_optional_int`]. Stops at the first bad
/// element and reports its position.
pub fn decode_repeated_optional_ints(
    name: &str,
    values: &[&str],
) -> Result<Vec<OptionalInt>, InvalidParameter> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| decode_scalar_optional_int(name, v).map_err(|e| e.at(i)))
        .collect()
}

/// Id lists: every element is required and must be a non-negative integer.
pub fn decode_repeated_uint(name: &str, values: &[&str]) -> Result<Vec<u64>, InvalidParameter> {
    let mut decoded = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        if value.is_empty() {
            return Err(InvalidParameter::new(name, ParamCause::Missing).at(i));
        }

        match value.parse::<u64>() {
            Ok(v) => decoded.push(v),
            Err(_) => {
                let cause = if value.parse::<i64>().is_ok() {
                    ParamCause::Negative(value.to_string())
                } else {
                    ParamCause::NotAnInteger(value.to_string())
                };
                return Err(InvalidParameter::new(name, cause).at(i));
            }
        }
    }

    Ok(decoded)
}

pub fn decode_optional_bool(name: &str, value: &str) -> Result<bool, InvalidParameter> {
    match value {
        "" => Ok(false),
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(InvalidParameter::new(name, ParamCause::NotABool(other.to_string()))),
    }
}

/// Identifiers that gate pagination or authorization. Missing, non-integer
/// and below-minimum values are all rejected.
pub fn decode_required_int(name: &str, value: Option<&str>, min: i64) -> Result<i64, InvalidParameter> {
    let value = match value {
        None | Some("") => return Err(InvalidParameter::new(name, ParamCause::Missing)),
        Some(v) => v,
    };

    let parsed = value
        .parse::<i64>()
        .map_err(|_| InvalidParameter::new(name, ParamCause::NotAnInteger(value.to_string())))?;

    if parsed < min {
        return Err(InvalidParameter::new(
            name,
            ParamCause::BelowMinimum { min, actual: parsed },
        ));
    }

    Ok(parsed)
}

pub fn decode_optional_uuid(name: &str, value: &str) -> Result<Option<Uuid>, InvalidParameter> {
    if value.is_empty() {
        return Ok(None);
    }

    Uuid::parse_str(value)
        .map(Some)
        .map_err(|_| InvalidParameter::new(name, ParamCause::NotAUuid(value.to_string())))
}

pub fn decode_optional_year_month(
    name: &str,
    value: &str,
) -> Result<Option<YearMonth>, InvalidParameter> {
    if value.is_empty() {
        return Ok(None);
    }

    let invalid = || InvalidParameter::new(name, ParamCause::NotAYearMonth(value.to_string()));

    // Reject "2024-5" and trailing days up front; chrono is lenient about widths.
    if value.len() != 7 {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").map_err(|_| invalid())?;

    Ok(Some(YearMonth {
        year: date.year(),
        month: date.month(),
    }))
}
