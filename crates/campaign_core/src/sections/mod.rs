//! Section decoders, one module per directory entry kind.

pub mod cmp;
pub mod evt;
pub mod obd;
pub mod obj;
pub mod plt;
pub mod pol;
pub mod pst;
pub mod tea;
pub mod uni;

use std::io::{self, Cursor};

use crate::error::CampaignError;
use crate::reader::LittleEndianReader;
use crate::version::Version;

pub use cmp::{CampaignState, SquadInfo, TeamBasicInfo};
pub use evt::{CampaignEvent, CampaignEvents};
pub use obd::{ObjectiveDelta, ObjectiveDeltas};
pub use obj::{Objective, ObjectiveLink, ObjectiveRadar, Objectives};
pub use plt::{PilotInfo, PilotRoster};
pub use pol::{PrimaryObjective, PrimaryObjectives, TeamPriority};
pub use pst::{PersistentObject, PersistentObjects};
pub use tea::{Team, TeamEntry, Teams};
pub use uni::UnitRoster;

/// Section kinds with a decoder. Directory entries are matched by token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Campaign,
    Objectives,
    ObjectiveDeltas,
    Teams,
    Units,
    Events,
    Pilots,
    Persistents,
    PrimaryObjectives,
    Version,
}

impl SectionKind {
    /// Classification order. VER is tried last so that a section whose name
    /// merely contains "ver" is taken by its own kind first.
    pub const CLASSIFY_ORDER: [SectionKind; 10] = [
        SectionKind::Campaign,
        SectionKind::Objectives,
        SectionKind::ObjectiveDeltas,
        SectionKind::Teams,
        SectionKind::Units,
        SectionKind::Events,
        SectionKind::Pilots,
        SectionKind::Persistents,
        SectionKind::PrimaryObjectives,
        SectionKind::Version,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Campaign => "CMP",
            Self::Objectives => "OBJ",
            Self::ObjectiveDeltas => "OBD",
            Self::Teams => "TEA",
            Self::Units => "UNI",
            Self::Events => "EVT",
            Self::Pilots => "PLT",
            Self::Persistents => "PST",
            Self::PrimaryObjectives => "POL",
            Self::Version => "VER",
        }
    }

    pub fn classify(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::CLASSIFY_ORDER
            .into_iter()
            .find(|kind| lower.contains(&kind.token().to_ascii_lowercase()))
    }

    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Self::Campaign | Self::Objectives | Self::ObjectiveDeltas | Self::Units
        )
    }
}

pub(crate) type SectionReader<'a> = LittleEndianReader<Cursor<&'a [u8]>>;

/// Runs `parse` over a whole section body and requires it to consume every
/// byte.
pub(crate) fn decode_body<'a, T>(
    section: &str,
    version: Version,
    body: &'a [u8],
    parse: impl FnOnce(&mut SectionReader<'a>) -> io::Result<T>,
) -> Result<T, CampaignError> {
    let span = tracing::debug_span!("decode_section", section, %version);
    let _enter = span.enter();

    let mut r = LittleEndianReader::new(Cursor::new(body));
    let value = parse(&mut r).map_err(|e| CampaignError::malformed(section, e))?;
    let consumed = r.position().map_err(|e| CampaignError::malformed(section, e))?;
    let len = body.len() as u64;
    if consumed != len {
        return Err(CampaignError::TruncatedStream {
            section: section.to_string(),
            consumed,
            len,
        });
    }
    tracing::debug!(section, len, "section decoded");
    Ok(value)
}

/// Maps an encoder's I/O failure onto the section it was writing.
pub(crate) fn encode_body(
    section: &str,
    emit: impl FnOnce(&mut Vec<u8>) -> io::Result<()>,
) -> Result<Vec<u8>, CampaignError> {
    let mut out = Vec::new();
    emit(&mut out).map_err(|e| CampaignError::malformed(section, e))?;
    Ok(out)
}
