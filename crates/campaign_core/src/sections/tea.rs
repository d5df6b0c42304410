//! Teams and their air, ground and naval tasking managers.

use std::io;

use crate::error::CampaignError;
use crate::identity::Identity;
use crate::records::MissionRequest;
use crate::version::Version;
use crate::writer::{PutLe, count_i16, count_u8};

use super::cmp::{MAX_TEAMS, TEAM_MOTTO_LEN, TEAM_NAME_LEN};
use super::{SectionReader, decode_body, encode_body};

pub const BONUS_OBJECTIVES: usize = 20;
pub const OBJTYPE_PRIORITIES: usize = 36;
pub const UNITTYPE_PRIORITIES: usize = 20;
pub const MISSION_PRIORITIES: usize = 50;
pub const AIRBASE_SCHEDULE_LEN: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamStatus {
    pub air_defense_vehicles: u16,
    pub aircraft: u16,
    pub ground_vehicles: u16,
    pub ships: u16,
    pub supply: u16,
    pub fuel: u16,
    pub airbases: u16,
    pub supply_level: u8,
    pub fuel_level: u8,
}

impl TeamStatus {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        Ok(Self {
            air_defense_vehicles: r.read_u16()?,
            aircraft: r.read_u16()?,
            ground_vehicles: r.read_u16()?,
            ships: r.read_u16()?,
            supply: r.read_u16()?,
            fuel: r.read_u16()?,
            airbases: r.read_u16()?,
            supply_level: r.read_u8()?,
            fuel_level: r.read_u8()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_u16(self.air_defense_vehicles);
        out.put_u16(self.aircraft);
        out.put_u16(self.ground_vehicles);
        out.put_u16(self.ships);
        out.put_u16(self.supply);
        out.put_u16(self.fuel);
        out.put_u16(self.airbases);
        out.put_u8(self.supply_level);
        out.put_u8(self.fuel_level);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundAction {
    pub time: u32,
    pub timeout: u32,
    pub objective: Identity,
    pub action_type: u8,
    pub tempo: u8,
    pub points: u8,
}

/// Offensive or defensive air action. Followed by 3 pad bytes on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AirAction {
    pub start: u32,
    pub stop: u32,
    pub objective: Identity,
    pub last_objective: Identity,
    pub action_type: u8,
}

impl AirAction {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let action = Self {
            start: r.read_u32()?,
            stop: r.read_u32()?,
            objective: r.read_identity()?,
            last_objective: r.read_identity()?,
            action_type: r.read_u8()?,
        };
        r.skip(3)?;
        Ok(action)
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_u32(self.start);
        out.put_u32(self.stop);
        out.put_identity(self.objective);
        out.put_identity(self.last_objective);
        out.put_u8(self.action_type);
        out.put_zeros(3);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: Identity,
    pub entity_type: u16,
    pub who: u8,
    pub cteam: u8,
    pub flags: i16,
    pub members: [u8; MAX_TEAMS],
    pub stance: [i16; MAX_TEAMS],
    pub first_colonel: i16,
    pub first_commander: i16,
    pub first_wingman: i16,
    pub last_wingman: i16,
    pub air_experience: u8,
    pub air_defense_experience: u8,
    pub ground_experience: u8,
    pub naval_experience: u8,
    pub initiative: i16,
    pub supply_available: u16,
    pub fuel_available: u16,
    pub replacements_available: u16,
    pub player_rating: f32,
    pub last_player_mission: u32,
    pub current_status: TeamStatus,
    pub start_status: TeamStatus,
    pub reinforcement: i16,
    pub bonus_objectives: [Identity; BONUS_OBJECTIVES],
    pub bonus_times: [u32; BONUS_OBJECTIVES],
    pub objtype_priority: [u8; OBJTYPE_PRIORITIES],
    pub unittype_priority: [u8; UNITTYPE_PRIORITIES],
    pub mission_priority: Vec<u8>,
    pub max_vehicle: [u8; 4],
    pub team_flag: u8,
    pub team_color: u8,
    pub equipment: u8,
    pub name: String,
    pub motto: String,
    pub ground_action: GroundAction,
    pub defensive_air_action: AirAction,
    pub offensive_air_action: AirAction,
}

impl Team {
    pub fn new(id: Identity, name: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: 0,
            who: 0,
            cteam: 0,
            flags: 0,
            members: [0; MAX_TEAMS],
            stance: [0; MAX_TEAMS],
            first_colonel: 0,
            first_commander: 0,
            first_wingman: 0,
            last_wingman: 0,
            air_experience: 0,
            air_defense_experience: 0,
            ground_experience: 0,
            naval_experience: 0,
            initiative: 0,
            supply_available: 0,
            fuel_available: 0,
            replacements_available: 0,
            player_rating: 0.0,
            last_player_mission: 0,
            current_status: TeamStatus::default(),
            start_status: TeamStatus::default(),
            reinforcement: 0,
            bonus_objectives: [Identity::ZERO; BONUS_OBJECTIVES],
            bonus_times: [0; BONUS_OBJECTIVES],
            objtype_priority: [0; OBJTYPE_PRIORITIES],
            unittype_priority: [0; UNITTYPE_PRIORITIES],
            mission_priority: vec![0; MISSION_PRIORITIES],
            max_vehicle: [0; 4],
            team_flag: 0,
            team_color: 0,
            equipment: 0,
            name: name.into(),
            motto: String::new(),
            ground_action: GroundAction::default(),
            defensive_air_action: AirAction::default(),
            offensive_air_action: AirAction::default(),
        }
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let id = r.read_identity()?;
        let entity_type = r.read_u16()?;
        let who = r.read_u8()?;
        let cteam = r.read_u8()?;
        let flags = r.read_i16()?;
        let members = r.read_u8_array()?;
        let stance = r.read_i16_array()?;
        let first_colonel = r.read_i16()?;
        let first_commander = r.read_i16()?;
        let first_wingman = r.read_i16()?;
        let last_wingman = r.read_i16()?;
        let air_experience = r.read_u8()?;
        let air_defense_experience = r.read_u8()?;
        let ground_experience = r.read_u8()?;
        let naval_experience = r.read_u8()?;
        let initiative = r.read_i16()?;
        let supply_available = r.read_u16()?;
        let fuel_available = r.read_u16()?;
        let replacements_available = r.read_u16()?;
        let player_rating = r.read_f32()?;
        let last_player_mission = r.read_u32()?;
        let current_status = TeamStatus::parse(r)?;
        let start_status = TeamStatus::parse(r)?;
        let reinforcement = r.read_i16()?;
        let mut bonus_objectives = [Identity::ZERO; BONUS_OBJECTIVES];
        for slot in &mut bonus_objectives {
            *slot = r.read_identity()?;
        }
        let bonus_times = r.read_u32_array()?;
        let objtype_priority = r.read_u8_array()?;
        let unittype_priority = r.read_u8_array()?;
        let mission_priority = r.read_bytes(MISSION_PRIORITIES)?;
        let max_vehicle = r.read_u8_array()?;
        let team_flag = r.read_u8()?;
        let team_color = r.read_u8()?;
        let equipment = r.read_u8()?;
        let name = r.read_fixed_string(TEAM_NAME_LEN)?;
        let motto = r.read_fixed_string(TEAM_MOTTO_LEN)?;
        let ground_action = GroundAction {
            time: r.read_u32()?,
            timeout: r.read_u32()?,
            objective: r.read_identity()?,
            action_type: r.read_u8()?,
            tempo: r.read_u8()?,
            points: r.read_u8()?,
        };
        let defensive_air_action = AirAction::parse(r)?;
        let offensive_air_action = AirAction::parse(r)?;

        Ok(Self {
            id,
            entity_type,
            who,
            cteam,
            flags,
            members,
            stance,
            first_colonel,
            first_commander,
            first_wingman,
            last_wingman,
            air_experience,
            air_defense_experience,
            ground_experience,
            naval_experience,
            initiative,
            supply_available,
            fuel_available,
            replacements_available,
            player_rating,
            last_player_mission,
            current_status,
            start_status,
            reinforcement,
            bonus_objectives,
            bonus_times,
            objtype_priority,
            unittype_priority,
            mission_priority,
            max_vehicle,
            team_flag,
            team_color,
            equipment,
            name,
            motto,
            ground_action,
            defensive_air_action,
            offensive_air_action,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.mission_priority.len() != MISSION_PRIORITIES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "team {} needs {MISSION_PRIORITIES} mission priorities, has {}",
                    self.id,
                    self.mission_priority.len()
                ),
            ));
        }
        out.put_identity(self.id);
        out.put_u16(self.entity_type);
        out.put_u8(self.who);
        out.put_u8(self.cteam);
        out.put_i16(self.flags);
        out.put_bytes(&self.members);
        for stance in self.stance {
            out.put_i16(stance);
        }
        out.put_i16(self.first_colonel);
        out.put_i16(self.first_commander);
        out.put_i16(self.first_wingman);
        out.put_i16(self.last_wingman);
        out.put_u8(self.air_experience);
        out.put_u8(self.air_defense_experience);
        out.put_u8(self.ground_experience);
        out.put_u8(self.naval_experience);
        out.put_i16(self.initiative);
        out.put_u16(self.supply_available);
        out.put_u16(self.fuel_available);
        out.put_u16(self.replacements_available);
        out.put_f32(self.player_rating);
        out.put_u32(self.last_player_mission);
        self.current_status.emit_to_vec(out);
        self.start_status.emit_to_vec(out);
        out.put_i16(self.reinforcement);
        for objective in self.bonus_objectives {
            out.put_identity(objective);
        }
        for time in self.bonus_times {
            out.put_u32(time);
        }
        out.put_bytes(&self.objtype_priority);
        out.put_bytes(&self.unittype_priority);
        out.put_bytes(&self.mission_priority);
        out.put_bytes(&self.max_vehicle);
        out.put_u8(self.team_flag);
        out.put_u8(self.team_color);
        out.put_u8(self.equipment);
        out.put_fixed_string(&self.name, TEAM_NAME_LEN);
        out.put_fixed_string(&self.motto, TEAM_MOTTO_LEN);
        out.put_u32(self.ground_action.time);
        out.put_u32(self.ground_action.timeout);
        out.put_identity(self.ground_action.objective);
        out.put_u8(self.ground_action.action_type);
        out.put_u8(self.ground_action.tempo);
        out.put_u8(self.ground_action.points);
        self.defensive_air_action.emit_to_vec(out);
        self.offensive_air_action.emit_to_vec(out);
        Ok(())
    }
}

/// Header shared by every campaign manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerBase {
    pub id: Identity,
    pub entity_type: u16,
    pub manager_flags: i16,
    pub owner: u8,
}

impl ManagerBase {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        Ok(Self {
            id: r.read_identity()?,
            entity_type: r.read_u16()?,
            manager_flags: r.read_i16()?,
            owner: r.read_u8()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_identity(self.id);
        out.put_u16(self.entity_type);
        out.put_i16(self.manager_flags);
        out.put_u8(self.owner);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtmAirbase {
    pub id: Identity,
    pub schedule: [u8; AIRBASE_SCHEDULE_LEN],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirTaskingManager {
    pub base: ManagerBase,
    pub flags: i16,
    pub average_ca_strength: i16,
    pub average_ca_missions: i16,
    pub sample_cycles: u8,
    pub airbases: Vec<AtmAirbase>,
    pub cycle: u8,
    pub requests: Vec<MissionRequest>,
}

impl AirTaskingManager {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let base = ManagerBase::parse(r)?;
        let flags = r.read_i16()?;
        let average_ca_strength = r.read_i16()?;
        let average_ca_missions = r.read_i16()?;
        let sample_cycles = r.read_u8()?;
        let airbase_count = r.read_u8()?;
        let airbases = r.read_vec(airbase_count as usize, |r| {
            Ok(AtmAirbase {
                id: r.read_identity()?,
                schedule: r.read_u8_array()?,
            })
        })?;
        let cycle = r.read_u8()?;
        let request_count = r.read_i16()?;
        let requests = r.read_vec(request_count.max(0) as usize, MissionRequest::parse)?;
        Ok(Self {
            base,
            flags,
            average_ca_strength,
            average_ca_missions,
            sample_cycles,
            airbases,
            cycle,
            requests,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        self.base.emit_to_vec(out);
        out.put_i16(self.flags);
        out.put_i16(self.average_ca_strength);
        out.put_i16(self.average_ca_missions);
        out.put_u8(self.sample_cycles);
        out.put_u8(count_u8(self.airbases.len(), "tasking airbase")?);
        for airbase in &self.airbases {
            out.put_identity(airbase.id);
            out.put_bytes(&airbase.schedule);
        }
        out.put_u8(self.cycle);
        out.put_i16(count_i16(self.requests.len(), "mission request")?);
        for request in &self.requests {
            request.emit_to_vec(out);
        }
        Ok(())
    }
}

/// Ground and naval tasking managers store only their flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskingManager {
    pub base: ManagerBase,
    pub flags: i16,
}

impl TaskingManager {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        Ok(Self {
            base: ManagerBase::parse(r)?,
            flags: r.read_i16()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        self.base.emit_to_vec(out);
        out.put_i16(self.flags);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamEntry {
    pub team: Team,
    pub air: AirTaskingManager,
    pub ground: TaskingManager,
    pub naval: TaskingManager,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Teams {
    pub entries: Vec<TeamEntry>,
}

impl Teams {
    pub fn decode(section: &str, bytes: &[u8], version: Version) -> Result<Self, CampaignError> {
        decode_body(section, version, bytes, Self::parse)
    }

    pub fn encode(&self, section: &str) -> Result<Vec<u8>, CampaignError> {
        encode_body(section, |out| self.emit_to_vec(out))
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let declared = r.read_i16()?;
        let count = (declared.max(0) as usize).min(MAX_TEAMS);
        if count != declared.max(0) as usize {
            tracing::debug!(declared, "team count clamped to {MAX_TEAMS}");
        }
        let entries = r.read_vec(count, |r| {
            Ok(TeamEntry {
                team: Team::parse(r)?,
                air: AirTaskingManager::parse(r)?,
                ground: TaskingManager::parse(r)?,
                naval: TaskingManager::parse(r)?,
            })
        })?;
        Ok(Self { entries })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.entries.len() > MAX_TEAMS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} teams exceed the {MAX_TEAMS} a campaign holds", self.entries.len()),
            ));
        }
        out.put_i16(count_i16(self.entries.len(), "team")?);
        for entry in &self.entries {
            entry.team.emit_to_vec(out)?;
            entry.air.emit_to_vec(out)?;
            entry.ground.emit_to_vec(out);
            entry.naval.emit_to_vec(out);
        }
        Ok(())
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.team.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, name: &str) -> TeamEntry {
        let mut team = Team::new(Identity::new(id, 0), name);
        team.stance[1] = -2;
        team.bonus_objectives[19] = Identity::new(1234, 1);
        team.mission_priority[49] = 9;
        team.motto = "Forward".to_string();
        team.offensive_air_action.objective = Identity::new(55, 1);
        let manager = ManagerBase {
            id: Identity::new(id + 100, 0),
            entity_type: 3,
            manager_flags: 0,
            owner: id as u8,
        };
        TeamEntry {
            team,
            air: AirTaskingManager {
                base: manager,
                airbases: vec![AtmAirbase {
                    id: Identity::new(77, 1),
                    schedule: [0xff; AIRBASE_SCHEDULE_LEN],
                }],
                requests: vec![MissionRequest {
                    priority: 12,
                    ..MissionRequest::default()
                }],
                ..AirTaskingManager::default()
            },
            ground: TaskingManager {
                base: manager,
                flags: 1,
            },
            naval: TaskingManager {
                base: manager,
                flags: 2,
            },
        }
    }

    #[test]
    fn teams_round_trip() {
        let tea = Teams {
            entries: vec![entry(1, "Neutral"), entry(2, "ROK")],
        };
        let bytes = tea.encode("TEA").expect("encode");
        let decoded = Teams::decode("TEA", &bytes, Version(79)).expect("decode");
        assert_eq!(decoded, tea);
        assert_eq!(decoded.team_names().collect::<Vec<_>>(), ["Neutral", "ROK"]);
    }

    #[test]
    fn more_than_eight_teams_cannot_be_written() {
        let tea = Teams {
            entries: (0..9).map(|i| entry(i, "T")).collect(),
        };
        assert!(tea.encode("TEA").is_err());
    }

    #[test]
    fn declared_count_above_eight_is_clamped() {
        let tea = Teams {
            entries: vec![entry(1, "Only")],
        };
        let mut bytes = tea.encode("TEA").expect("encode");
        // Claim 12 teams but hold one; decoding stops after the clamp of 8,
        // which runs out of data on the second team.
        bytes[..2].copy_from_slice(&12i16.to_le_bytes());
        assert!(matches!(
            Teams::decode("TEA", &bytes, Version::LATEST),
            Err(CampaignError::Malformed { .. })
        ));
    }
}
