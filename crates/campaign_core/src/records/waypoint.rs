use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::writer::PutLe;

pub const HAVE_DEPARTURE_TIME: u8 = 0x01;
pub const HAVE_TARGET: u8 = 0x02;
const GATE_BITS: u8 = HAVE_DEPARTURE_TIME | HAVE_TARGET;

/// Building index reported when a waypoint carries no target.
pub const NO_TARGET_BUILDING: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaypointTarget {
    pub id: Identity,
    pub building: u8,
}

/// A route point. `target` and `depart` are present exactly when their bit is
/// set in the stored `haves` byte; the bits are rebuilt from them on emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    /// `haves` bits other than the two presence bits.
    pub other_haves: u8,
    pub grid_x: i16,
    pub grid_y: i16,
    pub grid_z: i16,
    pub arrive: u32,
    pub action: u8,
    pub route_action: u8,
    /// Formation in the low nibble, spacing + 8 in the high nibble.
    pub formation_byte: u8,
    pub flags: u32,
    pub target: Option<WaypointTarget>,
    pub depart: Option<u32>,
}

impl Waypoint {
    pub fn new(grid_x: i16, grid_y: i16, grid_z: i16, arrive: u32) -> Self {
        Self {
            other_haves: 0,
            grid_x,
            grid_y,
            grid_z,
            arrive,
            action: 0,
            route_action: 0,
            formation_byte: 0x80,
            flags: 0,
            target: None,
            depart: None,
        }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let haves = r.read_u8()?;
        let grid_x = r.read_i16()?;
        let grid_y = r.read_i16()?;
        let grid_z = r.read_i16()?;
        let arrive = r.read_u32()?;
        let action = r.read_u8()?;
        let route_action = r.read_u8()?;
        let formation_byte = r.read_u8()?;
        let flags = r.read_u32()?;

        let target = if haves & HAVE_TARGET != 0 {
            Some(WaypointTarget {
                id: r.read_identity()?,
                building: r.read_u8()?,
            })
        } else {
            None
        };
        let depart = if haves & HAVE_DEPARTURE_TIME != 0 {
            Some(r.read_u32()?)
        } else {
            None
        };

        Ok(Self {
            other_haves: haves & !GATE_BITS,
            grid_x,
            grid_y,
            grid_z,
            arrive,
            action,
            route_action,
            formation_byte,
            flags,
            target,
            depart,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_u8(self.haves());
        out.put_i16(self.grid_x);
        out.put_i16(self.grid_y);
        out.put_i16(self.grid_z);
        out.put_u32(self.arrive);
        out.put_u8(self.action);
        out.put_u8(self.route_action);
        out.put_u8(self.formation_byte);
        out.put_u32(self.flags);
        if let Some(target) = self.target {
            out.put_identity(target.id);
            out.put_u8(target.building);
        }
        if let Some(depart) = self.depart {
            out.put_u32(depart);
        }
    }

    pub fn haves(&self) -> u8 {
        let mut haves = self.other_haves & !GATE_BITS;
        if self.target.is_some() {
            haves |= HAVE_TARGET;
        }
        if self.depart.is_some() {
            haves |= HAVE_DEPARTURE_TIME;
        }
        haves
    }

    pub fn target_id(&self) -> Identity {
        self.target.map_or(Identity::ZERO, |t| t.id)
    }

    pub fn target_building(&self) -> u8 {
        self.target.map_or(NO_TARGET_BUILDING, |t| t.building)
    }

    /// Departure time; a waypoint without one departs on arrival.
    pub fn depart_time(&self) -> u32 {
        self.depart.unwrap_or(self.arrive)
    }

    pub fn formation(&self) -> u8 {
        self.formation_byte & 0x0f
    }

    pub fn spacing(&self) -> i8 {
        (self.formation_byte >> 4) as i8 - 8
    }

    pub fn set_formation(&mut self, formation: u8, spacing: i8) {
        self.formation_byte = (formation & 0x0f) | (((spacing.wrapping_add(8) as u8) & 0x0f) << 4);
    }
}

pub fn parse_waypoints<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    count: usize,
) -> io::Result<Vec<Waypoint>> {
    r.read_vec(count, Waypoint::parse)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn decode(bytes: &[u8]) -> (Waypoint, u64) {
        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        let wp = Waypoint::parse(&mut r).expect("parse waypoint");
        (wp, r.remaining().expect("remaining"))
    }

    fn fixed_part(haves: u8) -> Vec<u8> {
        let mut out = vec![haves];
        out.put_i16(10);
        out.put_i16(20);
        out.put_i16(-300);
        out.put_u32(3_600_000);
        out.put_u8(4);
        out.put_u8(5);
        out.put_u8(0x93);
        out.put_u32(0xdead_beef);
        out
    }

    #[test]
    fn no_gate_bits_defaults_target_and_departure() {
        let (wp, rest) = decode(&fixed_part(0));
        assert_eq!(rest, 0);
        assert_eq!(wp.target_id(), Identity::ZERO);
        assert_eq!(wp.target_building(), NO_TARGET_BUILDING);
        assert_eq!(wp.depart_time(), 3_600_000);
        assert_eq!(wp.haves(), 0);
    }

    #[test]
    fn target_bit_reads_exact_target_bytes() {
        let mut bytes = fixed_part(HAVE_TARGET);
        bytes.put_identity(Identity::new(0x0102_0304, 9));
        bytes.put_u8(17);
        let (wp, rest) = decode(&bytes);
        assert_eq!(rest, 0);
        assert_eq!(wp.target_id(), Identity::new(0x0102_0304, 9));
        assert_eq!(wp.target_building(), 17);
        assert_eq!(wp.depart, None);

        let mut out = Vec::new();
        wp.emit_to_vec(&mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    fn departure_bit_reads_departure_time() {
        let mut bytes = fixed_part(HAVE_DEPARTURE_TIME);
        bytes.put_u32(3_700_000);
        let (wp, rest) = decode(&bytes);
        assert_eq!(rest, 0);
        assert_eq!(wp.depart_time(), 3_700_000);
        assert!(wp.target.is_none());
    }

    #[test]
    fn both_bits_and_unknown_bits_round_trip() {
        let mut bytes = fixed_part(0x80 | HAVE_TARGET | HAVE_DEPARTURE_TIME);
        bytes.put_identity(Identity::new(5, 6));
        bytes.put_u8(0);
        bytes.put_u32(42);
        let (wp, rest) = decode(&bytes);
        assert_eq!(rest, 0);
        assert_eq!(wp.other_haves, 0x80);

        let mut out = Vec::new();
        wp.emit_to_vec(&mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    fn formation_nibbles() {
        let (mut wp, _) = decode(&fixed_part(0));
        assert_eq!(wp.formation(), 3);
        assert_eq!(wp.spacing(), 1);
        wp.set_formation(7, -8);
        assert_eq!(wp.formation_byte, 0x07);
        assert_eq!(wp.spacing(), -8);
    }
}
