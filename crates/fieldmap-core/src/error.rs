//! Pipeline errors and their response codes.

use fieldmap_ingest::IngestError;
use fieldmap_model::{ErrorCode, ErrorResponse};
use thiserror::Error;

/// Message returned to callers for internal failures; the cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "an unexpected error occurred while processing the upload";

/// Why an upload could not be processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request lacks the file or the organization identifier.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("upload is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("the uploaded file has no non-blank lines")]
    EmptyInput,

    /// Required entity fields no header resolved to.
    #[error("missing required fields: {}", .missing.join(", "))]
    MissingRequiredFields { missing: Vec<String> },

    /// Headers resolved, but the first data row did not yield an entity.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

impl PipelineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingInput(_) => ErrorCode::MissingInput,
            Self::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            Self::EmptyInput => ErrorCode::EmptyInput,
            Self::MissingRequiredFields { .. } => ErrorCode::MissingRequiredFields,
            Self::InvalidRecord(_) => ErrorCode::InvalidRecord,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Structured failure for the caller. Internal details are not exposed.
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let message = match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };
        let response = ErrorResponse::new(self.code(), message).with_request_id(request_id);
        match self {
            Self::MissingRequiredFields { missing } => {
                response.with_missing_fields(missing.clone())
            }
            _ => response,
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::FileTooLarge { size, max_size } => Self::FileTooLarge { size, max_size },
            IngestError::EmptyInput => Self::EmptyInput,
            other => Self::Internal(other.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            PipelineError::MissingInput("file").code(),
            ErrorCode::MissingInput
        );
        assert_eq!(
            PipelineError::from(IngestError::EmptyInput).code(),
            ErrorCode::EmptyInput
        );
        assert_eq!(
            PipelineError::from(IngestError::FileTooLarge {
                size: 2,
                max_size: 1
            })
            .code(),
            ErrorCode::FileTooLarge
        );
    }

    #[test]
    fn test_internal_response_hides_cause() {
        let error = PipelineError::Internal(anyhow::anyhow!("dictionary has no entity fields"));
        let response = error.to_response(Some("req-7".to_string()));
        assert_eq!(response.code, ErrorCode::InternalError);
        assert_eq!(response.message, INTERNAL_ERROR_MESSAGE);
        assert_eq!(response.request_id.as_deref(), Some("req-7"));
        assert_eq!(response.code.status(), 500);
    }

    #[test]
    fn test_missing_fields_carried() {
        let error = PipelineError::MissingRequiredFields {
            missing: vec!["sector".to_string()],
        };
        let response = error.to_response(None);
        assert_eq!(response.message, "missing required fields: sector");
        assert_eq!(response.missing_fields, vec!["sector"]);
        assert_eq!(response.code.status(), 400);
    }
}
