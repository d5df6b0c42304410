use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::writer::PutLe;

/// Fields every objective and unit starts with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignBase {
    pub id: Identity,
    pub entity_type: u16,
    pub x: i16,
    pub y: i16,
    pub z: f32,
    pub spot_time: u32,
    pub spotted: i16,
    pub base_flags: i16,
    pub owner: u8,
    pub camp_id: i16,
}

impl CampaignBase {
    pub const LEN: usize = 8 + 2 + 2 + 2 + 4 + 4 + 2 + 2 + 1 + 2;

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            id: r.read_identity()?,
            entity_type: r.read_u16()?,
            x: r.read_i16()?,
            y: r.read_i16()?,
            z: r.read_f32()?,
            spot_time: r.read_u32()?,
            spotted: r.read_i16()?,
            base_flags: r.read_i16()?,
            owner: r.read_u8()?,
            camp_id: r.read_i16()?,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_identity(self.id);
        out.put_u16(self.entity_type);
        out.put_i16(self.x);
        out.put_i16(self.y);
        out.put_f32(self.z);
        out.put_u32(self.spot_time);
        out.put_i16(self.spotted);
        out.put_i16(self.base_flags);
        out.put_u8(self.owner);
        out.put_i16(self.camp_id);
    }
}
