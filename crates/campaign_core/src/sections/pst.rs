use std::io;

use crate::error::CampaignError;
use crate::version::Version;
use crate::writer::{PutLe, count_i32};

use super::{SectionReader, decode_body, encode_body};

/// Wreckage, craters and other persistent scenery left on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersistentObject {
    pub x: f32,
    pub y: f32,
    /// Stored creator first, unlike every other identity in the container.
    pub creator: u32,
    pub id: u32,
    pub index: u8,
    pub visual_type: i16,
    pub flags: i16,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistentObjects {
    pub objects: Vec<PersistentObject>,
}

impl PersistentObjects {
    pub fn decode(section: &str, bytes: &[u8], version: Version) -> Result<Self, CampaignError> {
        decode_body(section, version, bytes, Self::parse)
    }

    pub fn encode(&self, section: &str) -> Result<Vec<u8>, CampaignError> {
        encode_body(section, |out| self.emit_to_vec(out))
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let count = r.read_i32()?;
        let objects = r.read_vec(count.max(0) as usize, |r| {
            let x = r.read_f32()?;
            let y = r.read_f32()?;
            let creator = r.read_u32()?;
            let id = r.read_u32()?;
            let index = r.read_u8()?;
            r.skip(3)?;
            Ok(PersistentObject {
                x,
                y,
                creator,
                id,
                index,
                visual_type: r.read_i16()?,
                flags: r.read_i16()?,
            })
        })?;
        Ok(Self { objects })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_i32(count_i32(self.objects.len(), "persistent object")?);
        for obj in &self.objects {
            out.put_f32(obj.x);
            out.put_f32(obj.y);
            out.put_u32(obj.creator);
            out.put_u32(obj.id);
            out.put_u8(obj.index);
            out.put_zeros(3);
            out.put_i16(obj.visual_type);
            out.put_i16(obj.flags);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_round_trip_with_padding() {
        let pst = PersistentObjects {
            objects: vec![PersistentObject {
                x: 1024.5,
                y: -88.0,
                creator: 1,
                id: 4000,
                index: 2,
                visual_type: 31,
                flags: 0x10,
            }],
        };
        let bytes = pst.encode("PST").expect("encode");
        assert_eq!(bytes.len(), 4 + 24);
        assert_eq!(&bytes[4 + 17..4 + 20], &[0, 0, 0]);
        assert_eq!(PersistentObjects::decode("PST", &bytes, Version::LATEST).expect("decode"), pst);
    }
}
