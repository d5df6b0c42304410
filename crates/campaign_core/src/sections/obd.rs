use std::io;

use crate::compression::Codec;
use crate::error::CampaignError;
use crate::framing::{FrameHeader, frame, unframe};
use crate::identity::Identity;
use crate::version::Version;
use crate::writer::{PutLe, count_u8};

use super::{SectionReader, decode_body, encode_body};

const HEADER: FrameHeader = FrameHeader::CountBetweenLengths;

/// State of an objective that changed since the campaign was started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveDelta {
    pub id: Identity,
    pub last_repair: u32,
    pub owner: u8,
    pub supply: u8,
    pub fuel: u8,
    pub losses: u8,
    pub feature_status: Vec<u8>,
}

impl ObjectiveDelta {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let id = r.read_identity()?;
        let last_repair = r.read_u32()?;
        let owner = r.read_u8()?;
        let supply = r.read_u8()?;
        let fuel = r.read_u8()?;
        let losses = r.read_u8()?;
        let status_count = r.read_u8()?;
        let feature_status = r.read_bytes(status_count as usize)?;
        Ok(Self {
            id,
            last_repair,
            owner,
            supply,
            fuel,
            losses,
            feature_status,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_identity(self.id);
        out.put_u32(self.last_repair);
        out.put_u8(self.owner);
        out.put_u8(self.supply);
        out.put_u8(self.fuel);
        out.put_u8(self.losses);
        out.put_u8(count_u8(self.feature_status.len(), "feature status")?);
        out.put_bytes(&self.feature_status);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveDeltas {
    pub deltas: Vec<ObjectiveDelta>,
}

impl ObjectiveDeltas {
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
                deltas: r.read_vec(count, ObjectiveDelta::parse)?,
            })
        })
        .map(Some)
    }

    pub fn encode(&self, section: &str, codec: &dyn Codec) -> Result<Vec<u8>, CampaignError> {
        let body = encode_body(section, |out| {
            for delta in &self.deltas {
                delta.emit_to_vec(out)?;
            }
            Ok(())
        })?;
        frame(section, &body, self.deltas.len(), HEADER, codec)
    }
}
