use std::io;

use crate::error::CampaignError;
use crate::version::Version;
use crate::writer::{PutLe, count_i16};

use super::{SectionReader, decode_body, encode_body};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotInfo {
    pub usage: i16,
    pub voice_id: u8,
    pub photo_id: u8,
}

/// Pilot voice/photo assignments and callsign usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PilotRoster {
    pub pilots: Vec<PilotInfo>,
    pub callsigns: Vec<u8>,
}

impl PilotRoster {
    pub fn decode(section: &str, bytes: &[u8], version: Version) -> Result<Self, CampaignError> {
        decode_body(section, version, bytes, Self::parse)
    }

    pub fn encode(&self, section: &str) -> Result<Vec<u8>, CampaignError> {
        encode_body(section, |out| self.emit_to_vec(out))
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let pilot_count = r.read_i16()?;
        let pilots = r.read_vec(pilot_count.max(0) as usize, |r| {
            Ok(PilotInfo {
                usage: r.read_i16()?,
                voice_id: r.read_u8()?,
                photo_id: r.read_u8()?,
            })
        })?;
        let callsign_count = r.read_i16()?;
        let callsigns = r.read_bytes(callsign_count.max(0) as usize)?;
        Ok(Self { pilots, callsigns })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_i16(count_i16(self.pilots.len(), "pilot")?);
        for pilot in &self.pilots {
            out.put_i16(pilot.usage);
            out.put_u8(pilot.voice_id);
            out.put_u8(pilot.photo_id);
        }
        out.put_i16(count_i16(self.callsigns.len(), "callsign")?);
        out.put_bytes(&self.callsigns);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_round_trip() {
        let plt = PilotRoster {
            pilots: vec![
                PilotInfo {
                    usage: 2,
                    voice_id: 4,
                    photo_id: 9,
                },
                PilotInfo::default(),
            ],
            callsigns: vec![0, 1, 1, 0, 3],
        };
        let bytes = plt.encode("PLT").expect("encode");
        assert_eq!(bytes.len(), 2 + 2 * 4 + 2 + 5);
        assert_eq!(PilotRoster::decode("PLT", &bytes, Version(79)).expect("decode"), plt);
    }

    #[test]
    fn missing_callsign_table_is_malformed() {
        let mut bytes = Vec::new();
        bytes.put_i16(0);
        assert!(matches!(
            PilotRoster::decode("PLT", &bytes, Version::LATEST),
            Err(CampaignError::Malformed { .. })
        ));
    }
}
