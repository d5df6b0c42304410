use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::writer::{PutLe, count_u8};

use super::UnitBase;

pub const LOADOUT_SLOTS: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loadout {
    pub weapon_ids: [u16; LOADOUT_SLOTS],
    pub weapon_counts: [u8; LOADOUT_SLOTS],
}

impl Loadout {
    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            weapon_ids: r.read_u16_array()?,
            weapon_counts: r.read_u8_array()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        for id in self.weapon_ids {
            out.put_u16(id);
        }
        out.put_bytes(&self.weapon_counts);
    }
}

/// The 150-byte block a flight stores ahead of its own fields. Only the
/// home position, home plate and starting fuel are understood; the rest is
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightLead {
    pub lead_byte: u8,
    pub home_x: i16,
    pub home_y: i16,
    pub opaque_a: [u8; 13],
    pub home_plate: u16,
    pub opaque_b: Vec<u8>,
    pub starting_fuel: [u32; 4],
}

impl FlightLead {
    pub const LEN: usize = 150;
    const OPAQUE_B_LEN: usize = 114;

    pub fn new(home_x: i16, home_y: i16, home_plate: u16) -> Self {
        Self {
            lead_byte: 0,
            home_x,
            home_y,
            opaque_a: [0; 13],
            home_plate,
            opaque_b: vec![0; Self::OPAQUE_B_LEN],
            starting_fuel: [0; 4],
        }
    }

    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            lead_byte: r.read_u8()?,
            home_x: r.read_i16()?,
            home_y: r.read_i16()?,
            opaque_a: r.read_u8_array()?,
            home_plate: r.read_u16()?,
            opaque_b: r.read_bytes(Self::OPAQUE_B_LEN)?,
            starting_fuel: r.read_u32_array()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.opaque_b.len() != Self::OPAQUE_B_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "flight lead block needs {} opaque bytes, has {}",
                    Self::OPAQUE_B_LEN,
                    self.opaque_b.len()
                ),
            ));
        }
        out.put_u8(self.lead_byte);
        out.put_i16(self.home_x);
        out.put_i16(self.home_y);
        out.put_bytes(&self.opaque_a);
        out.put_u16(self.home_plate);
        out.put_bytes(&self.opaque_b);
        for fuel in self.starting_fuel {
            out.put_u32(fuel);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub unit: UnitBase,
    pub lead: FlightLead,
    pub z: f32,
    pub fuel_burnt: i32,
    pub last_move: u32,
    pub last_combat: u32,
    pub time_on_target: u32,
    pub mission_end_time: u32,
    pub mission_target: i16,
    pub loadouts: Vec<Loadout>,
    pub mission: u8,
    pub old_mission: u8,
    pub last_direction: u8,
    pub priority: u8,
    pub mission_id: u8,
    pub eval_flags: u8,
    pub mission_context: u8,
    pub package: Identity,
    pub squadron: Identity,
    pub requester: Identity,
    pub slots: [u8; 4],
    pub pilots: [u8; 4],
    pub plane_stats: [u8; 4],
    pub player_slots: [u8; 4],
    pub last_player_slot: u8,
    pub callsign_id: u8,
    pub callsign_num: u8,
    pub refuel_quantity: u32,
    pub skins: [u32; 4],
    pub trailer: [u8; 8],
}

impl Flight {
    pub fn new(unit: UnitBase, lead: FlightLead) -> Self {
        Self {
            unit,
            lead,
            z: 0.0,
            fuel_burnt: 0,
            last_move: 0,
            last_combat: 0,
            time_on_target: 0,
            mission_end_time: 0,
            mission_target: 0,
            loadouts: Vec::new(),
            mission: 0,
            old_mission: 0,
            last_direction: 0,
            priority: 0,
            mission_id: 0,
            eval_flags: 0,
            mission_context: 0,
            package: Identity::ZERO,
            squadron: Identity::ZERO,
            requester: Identity::ZERO,
            slots: [255; 4],
            pilots: [255; 4],
            plane_stats: [0; 4],
            player_slots: [255; 4],
            last_player_slot: 0,
            callsign_id: 0,
            callsign_num: 0,
            refuel_quantity: 0,
            skins: [0; 4],
            trailer: [0; 8],
        }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let unit = UnitBase::parse(r)?;
        let lead = FlightLead::parse(r)?;
        let z = r.read_f32()?;
        let fuel_burnt = r.read_i32()?;
        let last_move = r.read_u32()?;
        let last_combat = r.read_u32()?;
        let time_on_target = r.read_u32()?;
        let mission_end_time = r.read_u32()?;
        let mission_target = r.read_i16()?;
        let loadout_count = r.read_u8()?;
        let loadouts = r.read_vec(loadout_count as usize, Loadout::parse)?;

        Ok(Self {
            unit,
            lead,
            z,
            fuel_burnt,
            last_move,
            last_combat,
            time_on_target,
            mission_end_time,
            mission_target,
            loadouts,
            mission: r.read_u8()?,
            old_mission: r.read_u8()?,
            last_direction: r.read_u8()?,
            priority: r.read_u8()?,
            mission_id: r.read_u8()?,
            eval_flags: r.read_u8()?,
            mission_context: r.read_u8()?,
            package: r.read_identity()?,
            squadron: r.read_identity()?,
            requester: r.read_identity()?,
            slots: r.read_u8_array()?,
            pilots: r.read_u8_array()?,
            plane_stats: r.read_u8_array()?,
            player_slots: r.read_u8_array()?,
            last_player_slot: r.read_u8()?,
            callsign_id: r.read_u8()?,
            callsign_num: r.read_u8()?,
            refuel_quantity: r.read_u32()?,
            skins: r.read_u32_array()?,
            trailer: r.read_u8_array()?,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.unit.emit_to_vec(out)?;
        self.lead.emit_to_vec(out)?;
        out.put_f32(self.z);
        out.put_i32(self.fuel_burnt);
        out.put_u32(self.last_move);
        out.put_u32(self.last_combat);
        out.put_u32(self.time_on_target);
        out.put_u32(self.mission_end_time);
        out.put_i16(self.mission_target);
        out.put_u8(count_u8(self.loadouts.len(), "loadout")?);
        for loadout in &self.loadouts {
            loadout.emit_to_vec(out);
        }
        out.put_u8(self.mission);
        out.put_u8(self.old_mission);
        out.put_u8(self.last_direction);
        out.put_u8(self.priority);
        out.put_u8(self.mission_id);
        out.put_u8(self.eval_flags);
        out.put_u8(self.mission_context);
        out.put_identity(self.package);
        out.put_identity(self.squadron);
        out.put_identity(self.requester);
        out.put_bytes(&self.slots);
        out.put_bytes(&self.pilots);
        out.put_bytes(&self.plane_stats);
        out.put_bytes(&self.player_slots);
        out.put_u8(self.last_player_slot);
        out.put_u8(self.callsign_id);
        out.put_u8(self.callsign_num);
        out.put_u32(self.refuel_quantity);
        for skin in self.skins {
            out.put_u32(skin);
        }
        out.put_bytes(&self.trailer);
        Ok(())
    }
}
