use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::writer::{PutLe, count_u8};

use super::UnitBase;

/// Fields shared by brigades and battalions.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundUnit {
    pub unit: UnitBase,
    pub orders: u8,
    pub division: i16,
    pub assigned_objective: Identity,
}

impl GroundUnit {
    pub fn new(unit: UnitBase) -> Self {
        Self {
            unit,
            orders: 0,
            division: 0,
            assigned_objective: Identity::ZERO,
        }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            unit: UnitBase::parse(r)?,
            orders: r.read_u8()?,
            division: r.read_i16()?,
            assigned_objective: r.read_identity()?,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.unit.emit_to_vec(out)?;
        out.put_u8(self.orders);
        out.put_i16(self.division);
        out.put_identity(self.assigned_objective);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brigade {
    pub ground: GroundUnit,
    pub elements: Vec<Identity>,
}

impl Brigade {
    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let ground = GroundUnit::parse(r)?;
        let count = r.read_u8()?;
        let elements = r.read_vec(count as usize, |r| r.read_identity())?;
        Ok(Self { ground, elements })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.ground.emit_to_vec(out)?;
        out.put_u8(count_u8(self.elements.len(), "brigade element")?);
        for element in &self.elements {
            out.put_identity(*element);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Battalion {
    pub ground: GroundUnit,
    pub last_move: u32,
    pub last_combat: u32,
    pub parent: Identity,
    pub last_objective: Identity,
    pub supply: u8,
    pub fatigue: u8,
    pub morale: u8,
    pub heading: u8,
    pub final_heading: u8,
    pub position: u8,
}

impl Battalion {
    pub fn new(ground: GroundUnit) -> Self {
        Self {
            ground,
            last_move: 0,
            last_combat: 0,
            parent: Identity::ZERO,
            last_objective: Identity::ZERO,
            supply: 0,
            fatigue: 0,
            morale: 0,
            heading: 0,
            final_heading: 0,
            position: 0,
        }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            ground: GroundUnit::parse(r)?,
            last_move: r.read_u32()?,
            last_combat: r.read_u32()?,
            parent: r.read_identity()?,
            last_objective: r.read_identity()?,
            supply: r.read_u8()?,
            fatigue: r.read_u8()?,
            morale: r.read_u8()?,
            heading: r.read_u8()?,
            final_heading: r.read_u8()?,
            position: r.read_u8()?,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.ground.emit_to_vec(out)?;
        out.put_u32(self.last_move);
        out.put_u32(self.last_combat);
        out.put_identity(self.parent);
        out.put_identity(self.last_objective);
        out.put_u8(self.supply);
        out.put_u8(self.fatigue);
        out.put_u8(self.morale);
        out.put_u8(self.heading);
        out.put_u8(self.final_heading);
        out.put_u8(self.position);
        Ok(())
    }
}
