use std::error::Error;
use std::fmt;

use crate::error::CampaignError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    SectionNotFound,
    DecompressionFailed,
    TruncatedStream,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}

impl From<CampaignError> for CoreError {
    fn from(err: CampaignError) -> Self {
        let code = match &err {
            CampaignError::SectionNotFound { .. } => CoreErrorCode::SectionNotFound,
            CampaignError::DecompressionFailed { .. } => CoreErrorCode::DecompressionFailed,
            CampaignError::TruncatedStream { .. } => CoreErrorCode::TruncatedStream,
            CampaignError::Malformed { .. } | CampaignError::Directory { .. } => {
                CoreErrorCode::Parse
            }
        };
        Self::new(code, err.to_string())
    }
}
