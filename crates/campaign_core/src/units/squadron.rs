use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::writer::PutLe;

use super::UnitBase;

pub const SQUADRON_STORES: usize = 1000;
pub const SQUADRON_PILOTS: usize = 48;
pub const SCHEDULE_SLOTS: usize = 16;

/// A pilot on a squadron roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotSlot {
    pub id: i16,
    /// Skill in the low nibble, rating in the high nibble.
    pub skill_rating: u8,
    pub status: u8,
    pub aa_kills: u8,
    pub ag_kills: u8,
    pub as_kills: u8,
    pub an_kills: u8,
    pub missions: i16,
}

impl PilotSlot {
    pub const LEN: usize = 10;

    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            id: r.read_i16()?,
            skill_rating: r.read_u8()?,
            status: r.read_u8()?,
            aa_kills: r.read_u8()?,
            ag_kills: r.read_u8()?,
            as_kills: r.read_u8()?,
            an_kills: r.read_u8()?,
            missions: r.read_i16()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_i16(self.id);
        out.put_u8(self.skill_rating);
        out.put_u8(self.status);
        out.put_u8(self.aa_kills);
        out.put_u8(self.ag_kills);
        out.put_u8(self.as_kills);
        out.put_u8(self.an_kills);
        out.put_i16(self.missions);
    }

    pub fn skill(&self) -> u8 {
        self.skill_rating & 0x0f
    }

    pub fn rating(&self) -> u8 {
        self.skill_rating >> 4
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Squadron {
    pub unit: UnitBase,
    pub fuel: i32,
    pub specialty: u8,
    pub campaign_ratings: [u8; 16],
    /// Always [`SQUADRON_STORES`] entries.
    pub stores: Vec<u8>,
    /// Always [`SQUADRON_PILOTS`] entries.
    pub pilots: Vec<PilotSlot>,
    pub schedule: [i32; SCHEDULE_SLOTS],
    pub airbase: Identity,
    pub hot_spot: Identity,
    pub rating: [u8; 16],
    pub aa_kills: i16,
    pub ag_kills: i16,
    pub as_kills: i16,
    pub an_kills: i16,
    pub missions_flown: i16,
    pub mission_score: i16,
    pub total_losses: u8,
    pub pilot_losses: u8,
    pub patch: u16,
    pub retask_time: u32,
    pub default_skin: u32,
}

impl Squadron {
    pub fn new(unit: UnitBase) -> Self {
        Self {
            unit,
            fuel: 0,
            specialty: 0,
            campaign_ratings: [0; 16],
            stores: vec![0; SQUADRON_STORES],
            pilots: vec![PilotSlot::default(); SQUADRON_PILOTS],
            schedule: [0; SCHEDULE_SLOTS],
            airbase: Identity::ZERO,
            hot_spot: Identity::ZERO,
            rating: [0; 16],
            aa_kills: 0,
            ag_kills: 0,
            as_kills: 0,
            an_kills: 0,
            missions_flown: 0,
            mission_score: 0,
            total_losses: 0,
            pilot_losses: 0,
            patch: 0,
            retask_time: 0,
            default_skin: 0,
        }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let unit = UnitBase::parse(r)?;
        let fuel = r.read_i32()?;
        let specialty = r.read_u8()?;
        let campaign_ratings = r.read_u8_array()?;
        let stores = r.read_bytes(SQUADRON_STORES)?;
        let pilots = r.read_vec(SQUADRON_PILOTS, PilotSlot::parse)?;
        let schedule = r.read_i32_array()?;
        let airbase = r.read_identity()?;
        let hot_spot = r.read_identity()?;
        let rating = r.read_u8_array()?;
        let aa_kills = r.read_i16()?;
        let ag_kills = r.read_i16()?;
        let as_kills = r.read_i16()?;
        let an_kills = r.read_i16()?;
        let missions_flown = r.read_i16()?;
        let mission_score = r.read_i16()?;
        let total_losses = r.read_u8()?;
        let pilot_losses = r.read_u8()?;
        let patch = r.read_u16()?;
        let retask_time = r.read_u32()?;
        r.skip(1)?;
        let default_skin = r.read_u32()?;

        Ok(Self {
            unit,
            fuel,
            specialty,
            campaign_ratings,
            stores,
            pilots,
            schedule,
            airbase,
            hot_spot,
            rating,
            aa_kills,
            ag_kills,
            as_kills,
            an_kills,
            missions_flown,
            mission_score,
            total_losses,
            pilot_losses,
            patch,
            retask_time,
            default_skin,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.stores.len() != SQUADRON_STORES || self.pilots.len() != SQUADRON_PILOTS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "squadron {} needs {SQUADRON_STORES} stores and {SQUADRON_PILOTS} pilots, has {} and {}",
                    self.unit.base.id,
                    self.stores.len(),
                    self.pilots.len()
                ),
            ));
        }
        self.unit.emit_to_vec(out)?;
        out.put_i32(self.fuel);
        out.put_u8(self.specialty);
        out.put_bytes(&self.campaign_ratings);
        out.put_bytes(&self.stores);
        for pilot in &self.pilots {
            pilot.emit_to_vec(out);
        }
        for flight in self.schedule {
            out.put_i32(flight);
        }
        out.put_identity(self.airbase);
        out.put_identity(self.hot_spot);
        out.put_bytes(&self.rating);
        out.put_i16(self.aa_kills);
        out.put_i16(self.ag_kills);
        out.put_i16(self.as_kills);
        out.put_i16(self.an_kills);
        out.put_i16(self.missions_flown);
        out.put_i16(self.mission_score);
        out.put_u8(self.total_losses);
        out.put_u8(self.pilot_losses);
        out.put_u16(self.patch);
        out.put_u32(self.retask_time);
        out.put_zeros(1);
        out.put_u32(self.default_skin);
        Ok(())
    }

    /// Pilots with a non-negative id.
    pub fn active_pilots(&self) -> impl Iterator<Item = &PilotSlot> {
        self.pilots.iter().filter(|p| p.id >= 0)
    }
}
