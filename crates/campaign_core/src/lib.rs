//! Codec for Falcon campaign save containers (`.cam`/`.tac`).
//!
//! A container is a directory of named sections. Some sections are LZSS
//! compressed behind a small length header; the unit roster is decoded through
//! a caller-supplied class table.

pub mod campaign;
pub mod class_table;
pub mod compression;
pub mod container;
pub mod core_api;
pub mod error;
pub mod framing;
pub mod identity;
pub mod layout;
pub mod reader;
pub mod records;
pub mod sections;
pub mod units;
pub mod version;
pub mod writer;

pub use campaign::{Campaign, CampaignDocument, LoadOptions};
pub use class_table::{ClassEntry, ClassTable, Domain, UnitClassTable};
pub use compression::{Codec, CompressionError, Lzss};
pub use container::{ContainerBuilder, Directory, SectionDescriptor};
pub use error::{CampaignError, UnsupportedVariant};
pub use identity::Identity;
pub use version::Version;
