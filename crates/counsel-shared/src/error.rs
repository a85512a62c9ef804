//! Error types for case and conversation operations.

use crate::case::CaseId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    #[error("Case '{0}' not found")]
    NotFound(CaseId),

    #[error("{0}")]
    Validation(String),
}

impl CaseError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
