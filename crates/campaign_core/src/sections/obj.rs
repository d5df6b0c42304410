use std::io;

use crate::compression::Codec;
use crate::error::CampaignError;
use crate::framing::{FrameHeader, frame, unframe};
use crate::identity::Identity;
use crate::records::CampaignBase;
use crate::version::Version;
use crate::writer::{PutLe, count_u8};

use super::{SectionReader, decode_body, encode_body};

const HEADER: FrameHeader = FrameHeader::CountFirst;

/// Movement types with a link cost.
pub const MOVEMENT_TYPES: usize = 8;
pub const RADAR_ARCS: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectiveLink {
    pub costs: [u8; MOVEMENT_TYPES],
    pub id: Identity,
}

/// Radar coverage of an objective. `marker` is the non-zero byte that
/// announced the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveRadar {
    pub marker: u8,
    pub detect_ratios: [f32; RADAR_ARCS],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub objective_type: i16,
    pub base: CampaignBase,
    pub last_repair: u32,
    pub obj_flags: u32,
    pub supply: u8,
    pub fuel: u8,
    pub losses: u8,
    pub feature_status: Vec<u8>,
    pub priority: u8,
    pub name_id: i16,
    pub parent: Identity,
    pub first_owner: u8,
    pub links: Vec<ObjectiveLink>,
    pub radar: Option<ObjectiveRadar>,
}

impl Objective {
    pub fn new(objective_type: i16, base: CampaignBase) -> Self {
        Self {
            objective_type,
            base,
            last_repair: 0,
            obj_flags: 0,
            supply: 0,
            fuel: 0,
            losses: 0,
            feature_status: Vec::new(),
            priority: 0,
            name_id: 0,
            parent: Identity::ZERO,
            first_owner: 0,
            links: Vec::new(),
            radar: None,
        }
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let objective_type = r.read_i16()?;
        let base = CampaignBase::parse(r)?;
        let last_repair = r.read_u32()?;
        let obj_flags = r.read_u32()?;
        let supply = r.read_u8()?;
        let fuel = r.read_u8()?;
        let losses = r.read_u8()?;
        let status_count = r.read_u8()?;
        let feature_status = r.read_bytes(status_count as usize)?;
        let priority = r.read_u8()?;
        let name_id = r.read_i16()?;
        let parent = r.read_identity()?;
        let first_owner = r.read_u8()?;
        let link_count = r.read_u8()?;
        let links = r.read_vec(link_count as usize, |r| {
            Ok(ObjectiveLink {
                costs: r.read_u8_array()?,
                id: r.read_identity()?,
            })
        })?;
        let marker = r.read_u8()?;
        let radar = if marker > 0 {
            Some(ObjectiveRadar {
                marker,
                detect_ratios: r.read_f32_array()?,
            })
        } else {
            None
        };

        Ok(Self {
            objective_type,
            base,
            last_repair,
            obj_flags,
            supply,
            fuel,
            losses,
            feature_status,
            priority,
            name_id,
            parent,
            first_owner,
            links,
            radar,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_i16(self.objective_type);
        self.base.emit_to_vec(out);
        out.put_u32(self.last_repair);
        out.put_u32(self.obj_flags);
        out.put_u8(self.supply);
        out.put_u8(self.fuel);
        out.put_u8(self.losses);
        out.put_u8(count_u8(self.feature_status.len(), "feature status")?);
        out.put_bytes(&self.feature_status);
        out.put_u8(self.priority);
        out.put_i16(self.name_id);
        out.put_identity(self.parent);
        out.put_u8(self.first_owner);
        out.put_u8(count_u8(self.links.len(), "objective link")?);
        for link in &self.links {
            out.put_bytes(&link.costs);
            out.put_identity(link.id);
        }
        match &self.radar {
            Some(radar) => {
                out.put_u8(radar.marker.max(1));
                for ratio in radar.detect_ratios {
                    out.put_f32(ratio);
                }
            }
            None => out.put_u8(0),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objectives {
    pub objectives: Vec<Objective>,
}

impl Objectives {
    /// Returns `None` when the section header marks it empty.
    pub fn decode(
        section: &str,
        bytes: &[u8],
        version: Version,
        codec: &dyn Codec,
    ) -> Result<Option<Self>, CampaignError> {
        let Some(unframed) = unframe(section, bytes, HEADER, codec)? else {
            return Ok(None);
        };
        let count = unframed.fields.count.max(0) as usize;
        decode_body(section, version, &unframed.body, |r| {
            Ok(Self {
                objectives: r.read_vec(count, Objective::parse)?,
            })
        })
        .map(Some)
    }

    pub fn encode(&self, section: &str, codec: &dyn Codec) -> Result<Vec<u8>, CampaignError> {
        let body = encode_body(section, |out| {
            for objective in &self.objectives {
                objective.emit_to_vec(out)?;
            }
            Ok(())
        })?;
        frame(section, &body, self.objectives.len(), HEADER, codec)
    }

    pub fn find(&self, id: Identity) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.base.id == id)
    }
}
