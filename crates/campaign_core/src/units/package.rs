use std::io::{self, Read, Seek};

use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::records::{MissionRequest, Waypoint};
use crate::records::waypoint::parse_waypoints;
use crate::writer::{PutLe, count_u8};

use super::UnitBase;

/// Mission summary stored by a package whose planning finished without
/// waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageSummary {
    pub requests: i16,
    pub responses: i16,
    pub mission: i16,
    pub context: i16,
    pub requester: Identity,
    pub target: Identity,
    pub time_on_target: u32,
    pub action_type: u8,
    pub priority: i16,
}

impl PackageSummary {
    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self {
            requests: r.read_i16()?,
            responses: r.read_i16()?,
            mission: r.read_i16()?,
            context: r.read_i16()?,
            requester: r.read_identity()?,
            target: r.read_identity()?,
            time_on_target: r.read_u32()?,
            action_type: r.read_u8()?,
            priority: r.read_i16()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_i16(self.requests);
        out.put_i16(self.responses);
        out.put_i16(self.mission);
        out.put_i16(self.context);
        out.put_identity(self.requester);
        out.put_identity(self.target);
        out.put_u32(self.time_on_target);
        out.put_u8(self.action_type);
        out.put_i16(self.priority);
    }
}

/// Full planning state of a package still being built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageRoute {
    pub flights: u8,
    pub wait_length: i16,
    pub ingress: (i16, i16),
    pub egress: (i16, i16),
    pub break_point: (i16, i16),
    pub turn_point: (i16, i16),
    pub takeoff: u32,
    pub turn_point_time: u32,
    pub package_flags: u32,
    pub caps: i16,
    pub requests: i16,
    pub responses: i16,
    pub ingress_waypoints: Vec<Waypoint>,
    pub egress_waypoints: Vec<Waypoint>,
    pub request: MissionRequest,
}

fn read_point<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<(i16, i16)> {
    Ok((r.read_i16()?, r.read_i16()?))
}

fn put_point(out: &mut Vec<u8>, (x, y): (i16, i16)) {
    out.put_i16(x);
    out.put_i16(y);
}

fn emit_waypoint_run(out: &mut Vec<u8>, waypoints: &[Waypoint], what: &str) -> io::Result<()> {
    out.put_u8(count_u8(waypoints.len(), what)?);
    for waypoint in waypoints {
        waypoint.emit_to_vec(out);
    }
    Ok(())
}

impl PackageRoute {
    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let flights = r.read_u8()?;
        let wait_length = r.read_i16()?;
        let ingress = read_point(r)?;
        let egress = read_point(r)?;
        let break_point = read_point(r)?;
        let turn_point = read_point(r)?;
        let takeoff = r.read_u32()?;
        let turn_point_time = r.read_u32()?;
        let package_flags = r.read_u32()?;
        let caps = r.read_i16()?;
        let requests = r.read_i16()?;
        let responses = r.read_i16()?;
        let ingress_count = r.read_u8()?;
        let ingress_waypoints = parse_waypoints(r, ingress_count as usize)?;
        let egress_count = r.read_u8()?;
        let egress_waypoints = parse_waypoints(r, egress_count as usize)?;
        let request = MissionRequest::parse(r)?;

        Ok(Self {
            flights,
            wait_length,
            ingress,
            egress,
            break_point,
            turn_point,
            takeoff,
            turn_point_time,
            package_flags,
            caps,
            requests,
            responses,
            ingress_waypoints,
            egress_waypoints,
            request,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_u8(self.flights);
        out.put_i16(self.wait_length);
        put_point(out, self.ingress);
        put_point(out, self.egress);
        put_point(out, self.break_point);
        put_point(out, self.turn_point);
        out.put_u32(self.takeoff);
        out.put_u32(self.turn_point_time);
        out.put_u32(self.package_flags);
        out.put_i16(self.caps);
        out.put_i16(self.requests);
        out.put_i16(self.responses);
        emit_waypoint_run(out, &self.ingress_waypoints, "ingress waypoint")?;
        emit_waypoint_run(out, &self.egress_waypoints, "egress waypoint")?;
        self.request.emit_to_vec(out);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackageMission {
    Summary(PackageSummary),
    Route(Box<PackageRoute>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub unit: UnitBase,
    pub elements: Vec<Identity>,
    pub interceptor: Identity,
    pub awacs: Identity,
    pub jstar: Identity,
    pub ecm: Identity,
    pub tanker: Identity,
    pub wait_cycles: u8,
    pub mission: PackageMission,
}

impl Package {
    /// Whether a package with these values stores the short summary form.
    pub fn uses_summary(unit: &UnitBase, wait_cycles: u8) -> bool {
        unit.is_final() && wait_cycles == 0
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let unit = UnitBase::parse(r)?;
        let element_count = r.read_u8()?;
        let elements = r.read_vec(element_count as usize, |r| r.read_identity())?;
        let interceptor = r.read_identity()?;
        let awacs = r.read_identity()?;
        let jstar = r.read_identity()?;
        let ecm = r.read_identity()?;
        let tanker = r.read_identity()?;
        let wait_cycles = r.read_u8()?;

        let mission = if Self::uses_summary(&unit, wait_cycles) {
            PackageMission::Summary(PackageSummary::parse(r)?)
        } else {
            PackageMission::Route(Box::new(PackageRoute::parse(r)?))
        };

        Ok(Self {
            unit,
            elements,
            interceptor,
            awacs,
            jstar,
            ecm,
            tanker,
            wait_cycles,
            mission,
        })
    }

    /// Writes the package. The mission form must agree with the flags and
    /// wait cycles being written, since that is what a reader branches on.
    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let summary = Self::uses_summary(&self.unit, self.wait_cycles);
        if summary != matches!(self.mission, PackageMission::Summary(_)) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "package {} holds a {} but final={} wait_cycles={} selects the other form",
                    self.unit.base.id,
                    if summary { "route" } else { "summary" },
                    self.unit.is_final(),
                    self.wait_cycles
                ),
            ));
        }

        self.unit.emit_to_vec(out)?;
        out.put_u8(count_u8(self.elements.len(), "package element")?);
        for element in &self.elements {
            out.put_identity(*element);
        }
        out.put_identity(self.interceptor);
        out.put_identity(self.awacs);
        out.put_identity(self.jstar);
        out.put_identity(self.ecm);
        out.put_identity(self.tanker);
        out.put_u8(self.wait_cycles);
        match &self.mission {
            PackageMission::Summary(summary) => {
                summary.emit_to_vec(out);
                Ok(())
            }
            PackageMission::Route(route) => route.emit_to_vec(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::units::U_FINAL;
    use crate::units::tests::sample_unit;

    fn package(unit_flags: i32, wait_cycles: u8, mission: PackageMission) -> Package {
        let mut unit = sample_unit(500);
        unit.unit_flags = unit_flags;
        Package {
            unit,
            elements: vec![Identity::new(501, 1), Identity::new(502, 1)],
            interceptor: Identity::ZERO,
            awacs: Identity::new(510, 1),
            jstar: Identity::ZERO,
            ecm: Identity::ZERO,
            tanker: Identity::new(511, 1),
            wait_cycles,
            mission,
        }
    }

    fn round_trip(pkg: &Package) -> Vec<u8> {
        let mut out = Vec::new();
        pkg.emit_to_vec(&mut out).expect("emit package");
        let mut r = LittleEndianReader::new(Cursor::new(out.as_slice()));
        assert_eq!(&Package::parse(&mut r).expect("parse package"), pkg);
        assert_eq!(r.remaining().expect("remaining"), 0);
        out
    }

    #[test]
    fn final_package_without_wait_uses_summary() {
        let pkg = package(
            U_FINAL,
            0,
            PackageMission::Summary(PackageSummary {
                requests: 1,
                responses: 1,
                mission: 7,
                context: 3,
                requester: Identity::new(9, 1),
                target: Identity::new(10, 1),
                time_on_target: 7_200_000,
                action_type: 2,
                priority: 40,
            }),
        );
        round_trip(&pkg);
    }

    #[test]
    fn waiting_package_uses_route_with_distinct_egress() {
        let route = PackageRoute {
            flights: 2,
            ingress: (100, 120),
            egress: (140, 90),
            ingress_waypoints: vec![Waypoint::new(100, 120, -3000, 1_000)],
            egress_waypoints: vec![
                Waypoint::new(140, 90, -3000, 2_000),
                Waypoint::new(150, 80, -3000, 3_000),
            ],
            request: MissionRequest {
                mission: 7,
                slots: [0, 1, 255, 255],
                ..MissionRequest::default()
            },
            ..PackageRoute::default()
        };
        let pkg = package(U_FINAL, 3, PackageMission::Route(Box::new(route)));
        let out = round_trip(&pkg);
        assert!(out.len() > MissionRequest::LEN);
    }

    #[test]
    fn form_must_match_flags() {
        let pkg = package(0, 0, PackageMission::Summary(PackageSummary::default()));
        assert!(pkg.emit_to_vec(&mut Vec::new()).is_err());
    }
}
