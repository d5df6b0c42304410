//! Whole-container decode and encode.
//!
//! VER is resolved first and its version is handed to every other section
//! decoder. Sections are classified by name; a container may carry sections
//! with no decoder, and those are kept as raw bytes.

use std::io;

use serde::Deserialize;

use crate::class_table::ClassTable;
use crate::compression::Codec;
use crate::container::{ContainerBuilder, Directory, SectionDescriptor};
use crate::error::CampaignError;
use crate::layout::FileLayout;
use crate::sections::{
    CampaignEvents, CampaignState, ObjectiveDeltas, Objectives, PersistentObjects, PilotRoster,
    PrimaryObjectives, SectionKind, Teams, UnitRoster,
};
use crate::version::Version;

/// Knobs for a container load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Cap on type codes read by the unit roster loop. Defaults to half the
    /// decompressed roster length.
    pub max_roster_scan: Option<usize>,
    /// Treat a missing VER section as an error instead of assuming the
    /// newest layout.
    pub require_version: bool,
}

/// Decoded sections. A field is `None` when its section is missing from the
/// directory or, for compressed sections, marked empty by its header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Campaign {
    pub version: Version,
    pub campaign: Option<CampaignState>,
    pub objectives: Option<Objectives>,
    pub deltas: Option<ObjectiveDeltas>,
    pub teams: Option<Teams>,
    pub units: Option<UnitRoster>,
    pub events: Option<CampaignEvents>,
    pub pilots: Option<PilotRoster>,
    pub persistents: Option<PersistentObjects>,
    pub primary_objectives: Option<PrimaryObjectives>,
}

impl Campaign {
    pub fn decode(
        bytes: &[u8],
        class_table: &dyn ClassTable,
        codec: &dyn Codec,
        options: &LoadOptions,
    ) -> Result<Self, CampaignError> {
        let directory =
            Directory::parse(bytes).map_err(|source| CampaignError::Directory { source })?;
        decode_sections(&directory, bytes, class_table, codec, options)
    }

    /// Encodes one decoded section. Returns `None` when the campaign holds no
    /// value for `kind`, or holds a unit roster that was only partly decoded.
    pub fn encode_section(
        &self,
        kind: SectionKind,
        section: &str,
        class_table: &dyn ClassTable,
        codec: &dyn Codec,
    ) -> Result<Option<Vec<u8>>, CampaignError> {
        let encoded = match kind {
            SectionKind::Version => {
                let mut out = Vec::new();
                self.version.emit_to_vec(&mut out);
                Some(out)
            }
            SectionKind::Campaign => self
                .campaign
                .as_ref()
                .map(|v| v.encode(section, codec))
                .transpose()?,
            SectionKind::Objectives => self
                .objectives
                .as_ref()
                .map(|v| v.encode(section, codec))
                .transpose()?,
            SectionKind::ObjectiveDeltas => self
                .deltas
                .as_ref()
                .map(|v| v.encode(section, codec))
                .transpose()?,
            SectionKind::Teams => self.teams.as_ref().map(|v| v.encode(section)).transpose()?,
            // A roster that stopped at an unsupported entry is copied raw.
            SectionKind::Units => self
                .units
                .as_ref()
                .filter(|v| v.is_complete())
                .map(|v| v.encode(section, codec, class_table))
                .transpose()?,
            SectionKind::Events => self.events.as_ref().map(|v| v.encode(section)).transpose()?,
            SectionKind::Pilots => self.pilots.as_ref().map(|v| v.encode(section)).transpose()?,
            SectionKind::Persistents => self
                .persistents
                .as_ref()
                .map(|v| v.encode(section))
                .transpose()?,
            SectionKind::PrimaryObjectives => self
                .primary_objectives
                .as_ref()
                .map(|v| v.encode(section))
                .transpose()?,
        };
        Ok(encoded)
    }

    pub fn unit_count(&self) -> usize {
        self.units.as_ref().map_or(0, |u| u.units.len())
    }

    pub fn objective_count(&self) -> usize {
        self.objectives.as_ref().map_or(0, |o| o.objectives.len())
    }
}

/// First directory entry of each kind, in directory order.
fn classified(directory: &Directory) -> Vec<(SectionKind, &SectionDescriptor)> {
    let mut out: Vec<(SectionKind, &SectionDescriptor)> = Vec::new();
    for entry in directory.entries() {
        match SectionKind::classify(&entry.name) {
            Some(kind) if !out.iter().any(|(k, _)| *k == kind) => out.push((kind, entry)),
            Some(kind) => {
                tracing::debug!(section = %entry.name, ?kind, "duplicate section kind kept raw");
            }
            None => tracing::debug!(section = %entry.name, "no decoder for section"),
        }
    }
    out
}

fn section_bytes<'a>(bytes: &'a [u8], entry: &SectionDescriptor) -> &'a [u8] {
    let range = entry.range();
    &bytes[range.start..range.end]
}

fn decode_sections(
    directory: &Directory,
    bytes: &[u8],
    class_table: &dyn ClassTable,
    codec: &dyn Codec,
    options: &LoadOptions,
) -> Result<Campaign, CampaignError> {
    let sections = classified(directory);

    let version = match sections.iter().find(|(k, _)| *k == SectionKind::Version) {
        Some((_, entry)) => Version::parse(section_bytes(bytes, entry))
            .map_err(|e| CampaignError::malformed(&entry.name, e))
            .inspect_err(|e| {
                tracing::error!(section = %entry.name, error = %e, "section decode failed");
            })?,
        None if options.require_version => {
            let err = CampaignError::SectionNotFound {
                name: SectionKind::Version.token().to_string(),
            };
            tracing::error!(error = %err, "version section required");
            return Err(err);
        }
        None => {
            tracing::debug!("no version section, assuming newest layout");
            Version::LATEST
        }
    };

    let mut campaign = Campaign {
        version,
        ..Campaign::default()
    };
    for (kind, entry) in sections {
        let name = entry.name.as_str();
        let raw = section_bytes(bytes, entry);
        decode_one(&mut campaign, kind, name, raw, class_table, codec, options).inspect_err(
            |e| tracing::error!(section = name, %version, error = %e, "section decode failed"),
        )?;
    }
    Ok(campaign)
}

fn decode_one(
    campaign: &mut Campaign,
    kind: SectionKind,
    name: &str,
    raw: &[u8],
    class_table: &dyn ClassTable,
    codec: &dyn Codec,
    options: &LoadOptions,
) -> Result<(), CampaignError> {
    let version = campaign.version;
    match kind {
        SectionKind::Version => {}
        SectionKind::Campaign => {
            campaign.campaign = CampaignState::decode(name, raw, version, codec)?;
        }
        SectionKind::Objectives => {
            campaign.objectives = Objectives::decode(name, raw, version, codec)?;
        }
        SectionKind::ObjectiveDeltas => {
            campaign.deltas = ObjectiveDeltas::decode(name, raw, version, codec)?;
        }
        SectionKind::Teams => campaign.teams = Some(Teams::decode(name, raw, version)?),
        SectionKind::Units => {
            campaign.units = UnitRoster::decode(
                name,
                raw,
                version,
                codec,
                class_table,
                options.max_roster_scan,
            )?;
        }
        SectionKind::Events => campaign.events = Some(CampaignEvents::decode(name, raw, version)?),
        SectionKind::Pilots => campaign.pilots = Some(PilotRoster::decode(name, raw, version)?),
        SectionKind::Persistents => {
            campaign.persistents = Some(PersistentObjects::decode(name, raw, version)?);
        }
        SectionKind::PrimaryObjectives => {
            campaign.primary_objectives = Some(PrimaryObjectives::decode(name, raw, version)?);
        }
    }
    Ok(())
}

/// A decoded container together with the bytes it came from.
#[derive(Debug)]
pub struct CampaignDocument {
    pub campaign: Campaign,
    directory: Directory,
    layout: FileLayout,
    original: Vec<u8>,
}

impl CampaignDocument {
    pub fn parse(
        bytes: &[u8],
        class_table: &dyn ClassTable,
        codec: &dyn Codec,
        options: &LoadOptions,
    ) -> Result<Self, CampaignError> {
        let directory =
            Directory::parse(bytes).map_err(|source| CampaignError::Directory { source })?;
        let layout = directory
            .layout(bytes.len())
            .and_then(|layout| layout.validate().map(|()| layout))
            .map_err(|source| CampaignError::Directory { source })?;
        let campaign = decode_sections(&directory, bytes, class_table, codec, options)?;
        Ok(Self {
            campaign,
            directory,
            layout,
            original: bytes.to_vec(),
        })
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    /// Raw bytes of a section as stored in the container.
    pub fn section_blob(&self, name: &str) -> Option<&[u8]> {
        self.directory
            .entries()
            .iter()
            .find(|e| e.name == name)
            .map(|e| section_bytes(&self.original, e))
    }

    /// Reassembles the container from its layout ranges.
    pub fn to_bytes_unmodified(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.layout.file_len);
        for region in &self.layout.regions {
            let bytes = region.range.slice(&self.original).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{:?} lies outside the loaded bytes", region.kind),
                )
            })?;
            out.extend_from_slice(bytes);
        }
        if out.len() != self.layout.file_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "unmodified emit length mismatch: got {}, expected {}",
                    out.len(),
                    self.layout.file_len
                ),
            ));
        }
        Ok(out)
    }

    /// Re-encodes every decoded section and rebuilds the directory. Sections
    /// without a decoded value are copied through unchanged, in directory
    /// order.
    pub fn to_bytes(
        &self,
        class_table: &dyn ClassTable,
        codec: &dyn Codec,
    ) -> Result<Vec<u8>, CampaignError> {
        let mut seen = Vec::new();
        let mut builder = ContainerBuilder::new();
        for entry in self.directory.entries() {
            let kind = SectionKind::classify(&entry.name).filter(|k| !seen.contains(k));
            let encoded = match kind {
                Some(kind) => {
                    seen.push(kind);
                    self.campaign
                        .encode_section(kind, &entry.name, class_table, codec)
                        .inspect_err(|e| {
                            tracing::error!(section = %entry.name, error = %e, "section encode failed");
                        })?
                }
                None => None,
            };
            let bytes = encoded.unwrap_or_else(|| section_bytes(&self.original, entry).to_vec());
            builder.push(entry.name.clone(), bytes);
        }
        builder
            .build()
            .map_err(|source| CampaignError::Directory { source })
    }
}
