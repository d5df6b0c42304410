use std::io;

use thiserror::Error;

use crate::class_table::ClassEntry;
use crate::compression::CompressionError;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("section {name} not found in container directory")]
    SectionNotFound { name: String },
    #[error("section {section}: decompression failed: {source}")]
    DecompressionFailed {
        section: String,
        #[source]
        source: CompressionError,
    },
    #[error("section {section}: decoder stopped at byte {consumed} of {len}")]
    TruncatedStream {
        section: String,
        consumed: u64,
        len: u64,
    },
    #[error("section {section}: {source}")]
    Malformed {
        section: String,
        #[source]
        source: io::Error,
    },
    #[error("container directory: {source}")]
    Directory {
        #[source]
        source: io::Error,
    },
}

impl CampaignError {
    pub fn malformed(section: &str, source: io::Error) -> Self {
        Self::Malformed {
            section: section.to_string(),
            source,
        }
    }

    pub fn section(&self) -> Option<&str> {
        match self {
            Self::SectionNotFound { name } => Some(name),
            Self::DecompressionFailed { section, .. }
            | Self::TruncatedStream { section, .. }
            | Self::Malformed { section, .. } => Some(section),
            Self::Directory { .. } => None,
        }
    }
}

/// A roster entry whose class could not be mapped to a unit record. The
/// roster decoder drops these entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unit type {type_code} (class index {index}) has no unit record for {entry:?}")]
pub struct UnsupportedVariant {
    pub type_code: i16,
    pub index: usize,
    pub entry: Option<ClassEntry>,
}
