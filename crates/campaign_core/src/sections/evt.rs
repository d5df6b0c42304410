use std::io;

use crate::error::CampaignError;
use crate::version::Version;
use crate::writer::{PutLe, count_i16};

use super::{SectionReader, decode_body, encode_body};

/// Scripted campaign event and its trigger state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignEvent {
    pub id: i16,
    pub flags: i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignEvents {
    pub events: Vec<CampaignEvent>,
}

impl CampaignEvents {
    pub fn decode(section: &str, bytes: &[u8], version: Version) -> Result<Self, CampaignError> {
        decode_body(section, version, bytes, Self::parse)
    }

    pub fn encode(&self, section: &str) -> Result<Vec<u8>, CampaignError> {
        encode_body(section, |out| self.emit_to_vec(out))
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let count = r.read_i16()?;
        let events = r.read_vec(count.max(0) as usize, |r| {
            Ok(CampaignEvent {
                id: r.read_i16()?,
                flags: r.read_i16()?,
            })
        })?;
        Ok(Self { events })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_i16(count_i16(self.events.len(), "campaign event")?);
        for event in &self.events {
            out.put_i16(event.id);
            out.put_i16(event.flags);
        }
        Ok(())
    }
}
