//! Unit roster records and the class-table dispatch that picks their shape.

pub mod flight;
pub mod ground;
pub mod package;
pub mod squadron;
pub mod task_force;

use std::io::{self, Read, Seek};

use crate::class_table::{ClassEntry, ClassTable, Domain, TYPE_CODE_BASE, kind};
use crate::error::UnsupportedVariant;
use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::records::CampaignBase;
use crate::records::waypoint::{Waypoint, parse_waypoints};
use crate::writer::{PutLe, count_u16};

pub use flight::{Flight, Loadout};
pub use ground::{Battalion, Brigade, GroundUnit};
pub use package::{Package, PackageMission, PackageRoute, PackageSummary};
pub use squadron::{PilotSlot, Squadron};
pub use task_force::TaskForce;

/// Waypoint counts above this are not decoded.
pub const MAX_WAYPOINTS: u16 = 500;

/// `unit_flags` bit marking a unit whose planning is complete.
pub const U_FINAL: i32 = 0x0010_0000;

/// Fields shared by every unit, read before the variant tail.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitBase {
    pub base: CampaignBase,
    pub last_check: u32,
    pub roster: i32,
    pub unit_flags: i32,
    pub dest_x: i16,
    pub dest_y: i16,
    pub target: Identity,
    pub cargo: Identity,
    pub moved: u8,
    pub losses: u8,
    pub tactic: u8,
    pub current_waypoint: u16,
    pub name_id: i16,
    pub reinforcement: i16,
    pub waypoints: Vec<Waypoint>,
    /// A waypoint count above [`MAX_WAYPOINTS`]. Its waypoints were left
    /// unread and the count is written back unchanged.
    pub unread_waypoint_count: Option<u16>,
}

impl UnitBase {
    pub fn new(base: CampaignBase) -> Self {
        Self {
            base,
            last_check: 0,
            roster: 0,
            unit_flags: 0,
            dest_x: 0,
            dest_y: 0,
            target: Identity::ZERO,
            cargo: Identity::ZERO,
            moved: 0,
            losses: 0,
            tactic: 0,
            current_waypoint: 0,
            name_id: 0,
            reinforcement: 0,
            waypoints: Vec::new(),
            unread_waypoint_count: None,
        }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let base = CampaignBase::parse(r)?;
        let last_check = r.read_u32()?;
        let roster = r.read_i32()?;
        let unit_flags = r.read_i32()?;
        let dest_x = r.read_i16()?;
        let dest_y = r.read_i16()?;
        let target = r.read_identity()?;
        let cargo = r.read_identity()?;
        let moved = r.read_u8()?;
        let losses = r.read_u8()?;
        let tactic = r.read_u8()?;
        let current_waypoint = r.read_u16()?;
        let name_id = r.read_i16()?;
        let reinforcement = r.read_i16()?;

        let waypoint_count = r.read_u16()?;
        let (waypoints, unread_waypoint_count) = if waypoint_count > MAX_WAYPOINTS {
            tracing::debug!(waypoint_count, "waypoint count over limit, waypoints not read");
            (Vec::new(), Some(waypoint_count))
        } else {
            (parse_waypoints(r, waypoint_count as usize)?, None)
        };

        Ok(Self {
            base,
            last_check,
            roster,
            unit_flags,
            dest_x,
            dest_y,
            target,
            cargo,
            moved,
            losses,
            tactic,
            current_waypoint,
            name_id,
            reinforcement,
            waypoints,
            unread_waypoint_count,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.base.emit_to_vec(out);
        out.put_u32(self.last_check);
        out.put_i32(self.roster);
        out.put_i32(self.unit_flags);
        out.put_i16(self.dest_x);
        out.put_i16(self.dest_y);
        out.put_identity(self.target);
        out.put_identity(self.cargo);
        out.put_u8(self.moved);
        out.put_u8(self.losses);
        out.put_u8(self.tactic);
        out.put_u16(self.current_waypoint);
        out.put_i16(self.name_id);
        out.put_i16(self.reinforcement);

        match self.unread_waypoint_count {
            Some(count) => out.put_u16(count),
            None => {
                let count = count_u16(self.waypoints.len(), "waypoint")?;
                if count > MAX_WAYPOINTS {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("{count} waypoints exceed the {MAX_WAYPOINTS} that can be read back"),
                    ));
                }
                out.put_u16(count);
                for waypoint in &self.waypoints {
                    waypoint.emit_to_vec(out);
                }
            }
        }
        Ok(())
    }

    pub fn is_final(&self) -> bool {
        self.unit_flags & U_FINAL != 0
    }
}

/// Concrete record shape selected by a class table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitShape {
    Flight,
    Squadron,
    Package,
    Brigade,
    Battalion,
    TaskForce,
}

impl UnitShape {
    pub fn resolve(entry: ClassEntry) -> Option<Self> {
        match (entry.domain, entry.kind) {
            (Domain::Air, kind::FLIGHT) => Some(Self::Flight),
            (Domain::Air, kind::SQUADRON) => Some(Self::Squadron),
            (Domain::Air, kind::PACKAGE) => Some(Self::Package),
            (Domain::Land, kind::BRIGADE) => Some(Self::Brigade),
            (Domain::Land, kind::BATTALION) => Some(Self::Battalion),
            (Domain::Sea, kind::TASKFORCE) => Some(Self::TaskForce),
            (Domain::Undersea, kind::WOLFPACK) => Some(Self::TaskForce),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Squadron => "Squadron",
            Self::Package => "Package",
            Self::Brigade => "Brigade",
            Self::Battalion => "Battalion",
            Self::TaskForce => "TaskForce",
        }
    }
}

/// Class table index for a roster type code, clamped at zero.
pub fn class_index(type_code: i16) -> usize {
    (i32::from(type_code) - i32::from(TYPE_CODE_BASE)).max(0) as usize
}

pub fn dispatch(
    type_code: i16,
    class_table: &dyn ClassTable,
) -> Result<UnitShape, UnsupportedVariant> {
    let index = class_index(type_code);
    let entry = class_table.lookup(index);
    entry
        .and_then(UnitShape::resolve)
        .ok_or(UnsupportedVariant {
            type_code,
            index,
            entry,
        })
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitVariant {
    Flight(Box<Flight>),
    Squadron(Box<Squadron>),
    Package(Box<Package>),
    Brigade(Brigade),
    Battalion(Battalion),
    TaskForce(TaskForce),
}

impl UnitVariant {
    pub fn parse<R: Read + Seek>(
        shape: UnitShape,
        r: &mut LittleEndianReader<R>,
    ) -> io::Result<Self> {
        Ok(match shape {
            UnitShape::Flight => Self::Flight(Box::new(Flight::parse(r)?)),
            UnitShape::Squadron => Self::Squadron(Box::new(Squadron::parse(r)?)),
            UnitShape::Package => Self::Package(Box::new(Package::parse(r)?)),
            UnitShape::Brigade => Self::Brigade(Brigade::parse(r)?),
            UnitShape::Battalion => Self::Battalion(Battalion::parse(r)?),
            UnitShape::TaskForce => Self::TaskForce(TaskForce::parse(r)?),
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        match self {
            Self::Flight(v) => v.emit_to_vec(out),
            Self::Squadron(v) => v.emit_to_vec(out),
            Self::Package(v) => v.emit_to_vec(out),
            Self::Brigade(v) => v.emit_to_vec(out),
            Self::Battalion(v) => v.emit_to_vec(out),
            Self::TaskForce(v) => v.emit_to_vec(out),
        }
    }

    pub fn shape(&self) -> UnitShape {
        match self {
            Self::Flight(_) => UnitShape::Flight,
            Self::Squadron(_) => UnitShape::Squadron,
            Self::Package(_) => UnitShape::Package,
            Self::Brigade(_) => UnitShape::Brigade,
            Self::Battalion(_) => UnitShape::Battalion,
            Self::TaskForce(_) => UnitShape::TaskForce,
        }
    }

    pub fn unit(&self) -> &UnitBase {
        match self {
            Self::Flight(v) => &v.unit,
            Self::Squadron(v) => &v.unit,
            Self::Package(v) => &v.unit,
            Self::Brigade(v) => &v.ground.unit,
            Self::Battalion(v) => &v.ground.unit,
            Self::TaskForce(v) => &v.unit,
        }
    }
}

/// One roster entry: the stored type code and the record it selected.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    pub type_code: i16,
    pub variant: UnitVariant,
}

impl UnitRecord {
    pub fn id(&self) -> Identity {
        self.variant.unit().base.id
    }

    /// Writes the type code and body, refusing records whose type code the
    /// class table would route to a different shape.
    pub fn emit_to_vec(&self, out: &mut Vec<u8>, class_table: &dyn ClassTable) -> io::Result<()> {
        let expected = dispatch(self.type_code, class_table)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        if expected != self.variant.shape() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "unit {} has type code {} for a {} but holds a {}",
                    self.id(),
                    self.type_code,
                    expected.as_str(),
                    self.variant.shape().as_str()
                ),
            ));
        }
        out.put_i16(self.type_code);
        self.variant.emit_to_vec(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::class_table::UnitClassTable;
    use crate::records::waypoint::{HAVE_TARGET, WaypointTarget};

    pub(crate) fn sample_unit(id: u32) -> UnitBase {
        let mut unit = UnitBase::new(CampaignBase {
            id: Identity::new(id, 1),
            entity_type: 0x0300,
            x: 250,
            y: 310,
            z: -2000.0,
            spot_time: 1_000,
            spotted: 0,
            base_flags: 0,
            owner: 2,
            camp_id: id as i16,
        });
        unit.roster = 0x0f0f;
        unit.dest_x = 260;
        unit.dest_y = 305;
        unit.target = Identity::new(88, 1);
        unit.name_id = 12;
        unit.waypoints = vec![Waypoint::new(250, 310, -2000, 60_000), {
            let mut wp = Waypoint::new(260, 305, -2000, 120_000);
            wp.target = Some(WaypointTarget {
                id: Identity::new(88, 1),
                building: 3,
            });
            wp.depart = Some(125_000);
            wp
        }];
        unit
    }

    #[test]
    fn unit_base_round_trip() {
        let unit = sample_unit(400);
        let mut out = Vec::new();
        unit.emit_to_vec(&mut out).expect("emit unit");
        // Second waypoint carries target and departure (31 bytes), the first neither (18).
        let first_haves = out.len() - 31 - 18;
        assert_eq!(out[first_haves] & HAVE_TARGET, 0);
        assert_eq!(out[first_haves + 18] & HAVE_TARGET, HAVE_TARGET);

        let mut r = LittleEndianReader::new(Cursor::new(out.as_slice()));
        assert_eq!(UnitBase::parse(&mut r).expect("parse unit"), unit);
        assert_eq!(r.remaining().expect("remaining"), 0);
    }

    #[test]
    fn oversized_waypoint_count_skips_waypoints() {
        let mut unit = sample_unit(401);
        unit.waypoints.clear();
        unit.unread_waypoint_count = Some(MAX_WAYPOINTS + 1);
        let mut out = Vec::new();
        unit.emit_to_vec(&mut out).expect("emit unit");
        // Anything after the count belongs to the variant tail.
        out.extend_from_slice(&[1, 2, 3]);

        let mut r = LittleEndianReader::new(Cursor::new(out.as_slice()));
        let parsed = UnitBase::parse(&mut r).expect("parse unit");
        assert!(parsed.waypoints.is_empty());
        assert_eq!(parsed.unread_waypoint_count, Some(501));
        assert_eq!(r.remaining().expect("remaining"), 3);
    }

    #[test]
    fn dispatch_table_routes_every_pair() {
        let cases = [
            (Domain::Air, kind::FLIGHT, UnitShape::Flight),
            (Domain::Air, kind::SQUADRON, UnitShape::Squadron),
            (Domain::Air, kind::PACKAGE, UnitShape::Package),
            (Domain::Land, kind::BRIGADE, UnitShape::Brigade),
            (Domain::Land, kind::BATTALION, UnitShape::Battalion),
            (Domain::Sea, kind::TASKFORCE, UnitShape::TaskForce),
            (Domain::Undersea, kind::WOLFPACK, UnitShape::TaskForce),
        ];
        for (i, (domain, kind, shape)) in cases.into_iter().enumerate() {
            let table = UnitClassTable::new().with(i, ClassEntry::new(domain, kind));
            let type_code = TYPE_CODE_BASE + i as i16;
            assert_eq!(dispatch(type_code, &table), Ok(shape), "{domain} {kind}");
        }
    }

    #[test]
    fn unmapped_pairs_are_unsupported() {
        let table = UnitClassTable::new()
            .with(0, ClassEntry::new(Domain::Land, kind::FLIGHT + 40))
            .with(1, ClassEntry::new(Domain::Abstract, kind::FLIGHT));
        assert!(dispatch(100, &table).is_err());
        assert!(dispatch(101, &table).is_err());
        let err = dispatch(105, &table).expect_err("missing entry");
        assert_eq!(err.index, 5);
        assert_eq!(err.entry, None);
    }

    #[test]
    fn low_type_codes_clamp_to_index_zero() {
        assert_eq!(class_index(42), 0);
        assert_eq!(class_index(100), 0);
        assert_eq!(class_index(137), 37);
    }
}
