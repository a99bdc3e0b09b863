use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid organization id: '{0}'")]
    InvalidOrganizationId(String),
    #[error("invalid profile id: '{0}'")]
    InvalidProfileId(String),
    #[error("unknown record category: '{0}'")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
