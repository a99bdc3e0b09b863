//! Request/response contract handed to callers (UI, storage).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::processing::ProcessingResult;

/// Machine-readable failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingInput,
    FileTooLarge,
    EmptyInput,
    MissingRequiredFields,
    InvalidRecord,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingInput => "MISSING_INPUT",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::MissingRequiredFields => "MISSING_REQUIRED_FIELDS",
            Self::InvalidRecord => "INVALID_RECORD",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Input problems the user has to correct; never retried.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::InternalError)
    }

    /// HTTP-style status for this code.
    pub fn status(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: ErrorCode,
    pub message: String,
    /// Canonical fields the user has to supply (required-field failures only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
            missing_fields: Vec::new(),
            request_id: None,
        }
    }

    #[must_use]
    pub fn with_missing_fields(mut self, fields: Vec<String>) -> Self {
        self.missing_fields = fields;
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ProcessingResult,
}

/// Either a processing result or a structured failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Success(SuccessResponse),
    Failure(ErrorResponse),
}

impl UploadResponse {
    pub fn success(result: ProcessingResult) -> Self {
        Self::Success(SuccessResponse {
            success: true,
            result,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// HTTP-style status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(error) => error.code.status(),
        }
    }
}

impl From<ErrorResponse> for UploadResponse {
    fn from(error: ErrorResponse) -> Self {
        Self::Failure(error)
    }
}
