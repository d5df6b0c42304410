use std::io::{self, Read, Seek};

use crate::reader::LittleEndianReader;
use crate::writer::PutLe;

use super::UnitBase;

/// Naval task force or submarine wolfpack.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForce {
    pub unit: UnitBase,
    pub orders: u8,
    pub supply: u8,
}

impl TaskForce {
    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            unit: UnitBase::parse(r)?,
            orders: r.read_u8()?,
            supply: r.read_u8()?,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.unit.emit_to_vec(out)?;
        out.put_u8(self.orders);
        out.put_u8(self.supply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::units::tests::sample_unit;

    #[test]
    fn task_force_round_trip() {
        let tf = TaskForce {
            unit: sample_unit(300),
            orders: 5,
            supply: 90,
        };
        let mut out = Vec::new();
        tf.emit_to_vec(&mut out).expect("emit task force");
        assert_eq!(&out[out.len() - 2..], &[5, 90]);

        let mut r = LittleEndianReader::new(Cursor::new(out.as_slice()));
        assert_eq!(TaskForce::parse(&mut r).expect("parse task force"), tf);
    }
}
