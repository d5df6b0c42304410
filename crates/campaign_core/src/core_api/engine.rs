use crate::campaign::{Campaign, CampaignDocument, LoadOptions};
use crate::class_table::ClassTable;
use crate::compression::{Codec, Lzss};
use crate::container::Directory;
use crate::error::CampaignError;
use crate::layout::FileLayout;
use crate::sections::SectionKind;
use crate::units::UnitShape;

use super::error::{CoreError, CoreErrorCode};
use super::types::{CampaignTime, RecordCounts, SectionEntry, Snapshot};

#[derive(Debug, Default, Clone)]
pub struct Engine {
    options: LoadOptions,
}

#[derive(Debug)]
pub struct Session {
    snapshot: Snapshot,
    document: CampaignDocument,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        class_table: &dyn ClassTable,
    ) -> Result<Session, CoreError> {
        let document =
            CampaignDocument::parse(bytes.as_ref(), class_table, &Lzss, &self.options)?;
        let snapshot = build_snapshot(&document);
        Ok(Session { snapshot, document })
    }

    /// Lists the directory without decoding any section.
    pub fn read_sections<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Vec<SectionEntry>, CoreError> {
        let directory = Directory::parse(bytes.as_ref())
            .map_err(|source| CampaignError::Directory { source })?;
        Ok(section_entries(&directory))
    }
}

impl Session {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn campaign(&self) -> &Campaign {
        &self.document.campaign
    }

    /// Edits made here are picked up by [`Session::to_bytes`]. The snapshot
    /// keeps describing the loaded file.
    pub fn campaign_mut(&mut self) -> &mut Campaign {
        &mut self.document.campaign
    }

    pub fn layout(&self) -> &FileLayout {
        self.document.layout()
    }

    pub fn directory(&self) -> &Directory {
        self.document.directory()
    }

    pub fn to_bytes_unmodified(&self) -> Result<Vec<u8>, CoreError> {
        self.document.to_bytes_unmodified().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to reassemble container: {e}"),
            )
        })
    }

    /// Re-encodes every decoded section. `class_table` must route each unit's
    /// type code to the record shape it holds.
    pub fn to_bytes(&self, class_table: &dyn ClassTable) -> Result<Vec<u8>, CoreError> {
        self.to_bytes_with(class_table, &Lzss)
    }

    pub fn to_bytes_with(
        &self,
        class_table: &dyn ClassTable,
        codec: &dyn Codec,
    ) -> Result<Vec<u8>, CoreError> {
        self.document
            .to_bytes(class_table, codec)
            .map_err(CoreError::from)
    }
}

fn build_snapshot(document: &CampaignDocument) -> Snapshot {
    let campaign = &document.campaign;
    let state = campaign.campaign.as_ref();

    let team_names = match (&campaign.teams, state) {
        (Some(teams), _) => teams.team_names().map(str::to_string).collect(),
        (None, Some(state)) => state.team_names().map(str::to_string).collect(),
        (None, None) => Vec::new(),
    };

    let sections = section_entries(document.directory());

    let units = campaign.units.as_ref();
    let counts = RecordCounts {
        objectives: campaign.objective_count(),
        objective_deltas: campaign.deltas.as_ref().map_or(0, |d| d.deltas.len()),
        teams: campaign.teams.as_ref().map_or(0, |t| t.entries.len()),
        units: campaign.unit_count(),
        flights: units.map_or(0, |u| u.count_by_shape(UnitShape::Flight)),
        squadrons: units.map_or(0, |u| u.count_by_shape(UnitShape::Squadron)),
        events: campaign.events.as_ref().map_or(0, |e| e.events.len()),
        pilots: campaign.pilots.as_ref().map_or(0, |p| p.pilots.len()),
        persistents: campaign.persistents.as_ref().map_or(0, |p| p.objects.len()),
        primary_objectives: campaign
            .primary_objectives
            .as_ref()
            .map_or(0, |p| p.objectives.len()),
    };

    Snapshot {
        version: (!campaign.version.is_latest()).then_some(campaign.version.0),
        campaign_time: state.map(|s| CampaignTime::from_millis(s.current_time)),
        theater: state.map(|s| s.theater_name.clone()),
        scenario: state.map(|s| s.scenario.clone()),
        team_names,
        sections,
        counts,
    }
}

fn section_entries(directory: &Directory) -> Vec<SectionEntry> {
    directory
        .entries()
        .iter()
        .map(|entry| SectionEntry {
            name: entry.name.clone(),
            kind: SectionKind::classify(&entry.name).map(|k| k.token()),
            offset: entry.offset,
            size: entry.size,
        })
        .collect()
}
