use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::writer::PutLe;

/// A full mission request as stored by packages and the air tasking manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionRequest {
    pub requester: Identity,
    pub target: Identity,
    pub secondary: Identity,
    pub package: Identity,
    pub who: u8,
    pub vs: u8,
    pub tot: u32,
    pub tx: i16,
    pub ty: i16,
    pub flags: u32,
    pub caps: i16,
    pub target_count: i16,
    pub speed: i16,
    pub match_strength: i16,
    pub priority: i16,
    pub tot_type: u8,
    pub action_type: u8,
    pub mission: u8,
    pub aircraft: u8,
    pub context: u8,
    pub roe_check: u8,
    pub delayed: u8,
    pub start_block: u8,
    pub final_block: u8,
    pub slots: [u8; 4],
    pub min_takeoff: i8,
    pub max_takeoff: i8,
}

impl MissionRequest {
    pub const LEN: usize = 4 * 8 + 2 + 2 + 4 + 2 + 2 + 4 + 5 * 2 + 9 + 4 + 2 + 3;

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let requester = r.read_identity()?;
        let target = r.read_identity()?;
        let secondary = r.read_identity()?;
        let package = r.read_identity()?;
        let who = r.read_u8()?;
        let vs = r.read_u8()?;
        r.skip(2)?;
        let tot = r.read_u32()?;
        let tx = r.read_i16()?;
        let ty = r.read_i16()?;
        let flags = r.read_u32()?;
        let caps = r.read_i16()?;
        let target_count = r.read_i16()?;
        let speed = r.read_i16()?;
        let match_strength = r.read_i16()?;
        let priority = r.read_i16()?;
        let tot_type = r.read_u8()?;
        let action_type = r.read_u8()?;
        let mission = r.read_u8()?;
        let aircraft = r.read_u8()?;
        let context = r.read_u8()?;
        let roe_check = r.read_u8()?;
        let delayed = r.read_u8()?;
        let start_block = r.read_u8()?;
        let final_block = r.read_u8()?;
        let slots = r.read_u8_array::<4>()?;
        let min_takeoff = r.read_i8()?;
        let max_takeoff = r.read_i8()?;
        r.skip(3)?;

        Ok(Self {
            requester,
            target,
            secondary,
            package,
            who,
            vs,
            tot,
            tx,
            ty,
            flags,
            caps,
            target_count,
            speed,
            match_strength,
            priority,
            tot_type,
            action_type,
            mission,
            aircraft,
            context,
            roe_check,
            delayed,
            start_block,
            final_block,
            slots,
            min_takeoff,
            max_takeoff,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_identity(self.requester);
        out.put_identity(self.target);
        out.put_identity(self.secondary);
        out.put_identity(self.package);
        out.put_u8(self.who);
        out.put_u8(self.vs);
        out.put_zeros(2);
        out.put_u32(self.tot);
        out.put_i16(self.tx);
        out.put_i16(self.ty);
        out.put_u32(self.flags);
        out.put_i16(self.caps);
        out.put_i16(self.target_count);
        out.put_i16(self.speed);
        out.put_i16(self.match_strength);
        out.put_i16(self.priority);
        out.put_u8(self.tot_type);
        out.put_u8(self.action_type);
        out.put_u8(self.mission);
        out.put_u8(self.aircraft);
        out.put_u8(self.context);
        out.put_u8(self.roe_check);
        out.put_u8(self.delayed);
        out.put_u8(self.start_block);
        out.put_u8(self.final_block);
        out.put_bytes(&self.slots);
        out.put_i8(self.min_takeoff);
        out.put_i8(self.max_takeoff);
        out.put_zeros(3);
    }
}
