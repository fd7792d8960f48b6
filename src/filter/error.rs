// src/filter/error.rs
use thiserror::Error;

/// Why a single query or path parameter was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamCause {
    #[error("value is required")]
    Missing,
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
    #[error("'{0}' must not be negative")]
    Negative(String),
    #[error("{actual} is below the minimum of {min}")]
    BelowMinimum { min: i64, actual: i64 },
    #[error("'{0}' is not a boolean")]
    NotABool(String),
    #[error("'{0}' is not a UUID")]
    NotAUuid(String),
    #[error("'{0}' is not a YYYY-MM month")]
    NotAYearMonth(String),
}

/// A named parameter that could not be coerced to its declared kind.
///
/// `index` is set for repeated (`name[]`) parameters and points at the
/// first element that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter '{parameter}'{}: {cause}", position(.index))]
pub struct InvalidParameter {
    pub parameter: String,
    pub index: Option<usize>,
    pub cause: ParamCause,
}

fn position(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at position {}", i),
        None => String::new(),
    }
}

impl InvalidParameter {
    pub fn new(parameter: &str, cause: ParamCause) -> Self {
        Self {
            parameter: parameter.to_string(),
            index: None,
            cause,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Client-caused failure leaving the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("bad request: {0}")]
    InvalidParameter(#[from] InvalidParameter),
}

impl RequestError {
    /// Every decoder failure is the client's fault.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, RequestError::InvalidParameter(_))
    }

    pub fn parameter(&self) -> &str {
        match self {
            RequestError::InvalidParameter(p) => &p.parameter,
        }
    }

    pub fn invalid_parameter(&self) -> &InvalidParameter {
        match self {
            RequestError::InvalidParameter(p) => p,
        }
    }
}
