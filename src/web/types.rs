// src/web/types.rs
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;

use crate::filter::{FlagTaxonomy, RequestError};

pub struct ServerConfig {
    pub taxonomy: FlagTaxonomy,
}

/// Error half of every API handler result.
pub type ErrorReply = status::Custom<Json<StandardErrorResponse>>;

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            parameter: None,
            suggestions,
        }
    }

    pub fn with_parameter(mut self, parameter: String) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn reply(self, status: Status) -> ErrorReply {
        status::Custom(status, Json(self))
    }
}

impl From<&RequestError> for StandardErrorResponse {
    fn from(err: &RequestError) -> Self {
        let param = err.invalid_parameter();
        let suggestion = match param.index {
            Some(index) => format!("Check element {} of '{}'", index, param.parameter),
            None => format!("Check the value of '{}'", param.parameter),
        };

        StandardErrorResponse::new(
            err.to_string(),
            "INVALID_PARAMETER".to_string(),
            vec![suggestion, "See GET /api/filters for accepted parameters".to_string()],
        )
        .with_parameter(param.parameter.clone())
    }
}
