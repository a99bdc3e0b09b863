#![deny(unsafe_code)]

pub mod error;
pub mod extract;
pub mod options;
pub mod pipeline;
pub mod validate;

pub use error::{INTERNAL_ERROR_MESSAGE, PipelineError, Result};
pub use options::PipelineOptions;
pub use pipeline::{Pipeline, require_organization};
