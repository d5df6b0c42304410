//! Campaign clock, scoring and per-team summary state.

use std::io;

use crate::compression::Codec;
use crate::error::CampaignError;
use crate::framing::{FrameHeader, frame, unframe};
use crate::identity::Identity;
use crate::reader::LittleEndianReader;
use crate::records::EventNode;
use crate::records::event_node::{emit_event_list, parse_event_list};
use crate::version::Version;
use crate::writer::{PutLe, count_i16};

use super::{SectionReader, decode_body, encode_body};

const HEADER: FrameHeader = FrameHeader::Lengths;

pub const MAX_TEAMS: usize = 8;
pub const TEAM_NAME_LEN: usize = 20;
pub const TEAM_MOTTO_LEN: usize = 200;
const NAME_LEN: usize = 40;
const SQUAD_NAME_LEN: usize = 80;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamBasicInfo {
    pub flag: u8,
    pub color: u8,
    pub name: String,
    pub motto: String,
}

impl TeamBasicInfo {
    pub(crate) fn parse<R: io::Read + io::Seek>(
        r: &mut LittleEndianReader<R>,
    ) -> io::Result<Self> {
        Ok(Self {
            flag: r.read_u8()?,
            color: r.read_u8()?,
            name: r.read_fixed_string(TEAM_NAME_LEN)?,
            motto: r.read_fixed_string(TEAM_MOTTO_LEN)?,
        })
    }

    pub(crate) fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_u8(self.flag);
        out.put_u8(self.color);
        out.put_fixed_string(&self.name, TEAM_NAME_LEN);
        out.put_fixed_string(&self.motto, TEAM_MOTTO_LEN);
    }
}

/// A squadron the player can join.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquadInfo {
    pub x: f32,
    pub y: f32,
    pub id: Identity,
    pub description_index: i16,
    pub name_id: i16,
    pub airbase_icon: i16,
    pub squadron_patch: i16,
    pub specialty: u8,
    pub current_strength: u8,
    pub country: u8,
    pub airbase_name: String,
    pub flags: u32,
    pub campaign_id: u32,
    pub squadron_name: String,
}

impl SquadInfo {
    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let x = r.read_f32()?;
        let y = r.read_f32()?;
        let id = r.read_identity()?;
        let description_index = r.read_i16()?;
        let name_id = r.read_i16()?;
        let airbase_icon = r.read_i16()?;
        let squadron_patch = r.read_i16()?;
        let specialty = r.read_u8()?;
        let current_strength = r.read_u8()?;
        let country = r.read_u8()?;
        let airbase_name = r.read_fixed_string(SQUAD_NAME_LEN)?;
        r.skip(1)?;
        Ok(Self {
            x,
            y,
            id,
            description_index,
            name_id,
            airbase_icon,
            squadron_patch,
            specialty,
            current_strength,
            country,
            airbase_name,
            flags: r.read_u32()?,
            campaign_id: r.read_u32()?,
            squadron_name: r.read_fixed_string(SQUAD_NAME_LEN)?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.put_f32(self.x);
        out.put_f32(self.y);
        out.put_identity(self.id);
        out.put_i16(self.description_index);
        out.put_i16(self.name_id);
        out.put_i16(self.airbase_icon);
        out.put_i16(self.squadron_patch);
        out.put_u8(self.specialty);
        out.put_u8(self.current_strength);
        out.put_u8(self.country);
        out.put_fixed_string(&self.airbase_name, SQUAD_NAME_LEN);
        out.put_zeros(1);
        out.put_u32(self.flags);
        out.put_u32(self.campaign_id);
        out.put_fixed_string(&self.squadron_name, SQUAD_NAME_LEN);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignState {
    pub current_time: u32,
    pub start_time: u32,
    pub time_limit: u32,
    pub victory_points: i32,
    pub campaign_type: i32,
    pub number_of_teams: i32,
    pub aircraft: [i32; MAX_TEAMS],
    pub player_aircraft: [i32; MAX_TEAMS],
    pub te_team: i32,
    pub team_points: [i32; MAX_TEAMS],
    pub flags: i32,
    /// Always [`MAX_TEAMS`] entries.
    pub team_info: Vec<TeamBasicInfo>,
    pub last_major_event: u32,
    pub last_resupply: u32,
    pub last_repair: u32,
    pub last_reinforcement: u32,
    pub time_stamp: i16,
    pub group: i16,
    pub ground_ratio: i16,
    pub air_ratio: i16,
    pub air_defense_ratio: i16,
    pub naval_ratio: i16,
    pub brief: i16,
    pub theater_size_x: i16,
    pub theater_size_y: i16,
    pub current_day: u8,
    pub active_teams: u8,
    pub day_zero: u8,
    pub endgame_result: u8,
    pub situation: u8,
    pub enemy_air_exp: u8,
    pub enemy_ad_exp: u8,
    pub bullseye_name: u8,
    pub bullseye_x: i16,
    pub bullseye_y: i16,
    pub theater_name: String,
    pub scenario: String,
    pub save_file: String,
    pub ui_name: String,
    pub player_squadron: Identity,
    pub recent_events: Vec<EventNode>,
    pub priority_events: Vec<EventNode>,
    pub campaign_map: Vec<u8>,
    pub last_index_num: i16,
    pub squadrons: Vec<SquadInfo>,
    pub tempo: u8,
    pub creator_ip: i32,
    pub creation_time: i32,
    pub creation_rand: i32,
}

impl CampaignState {
    /// An empty state with all [`MAX_TEAMS`] team slots present.
    pub fn new() -> Self {
        Self {
            team_info: vec![TeamBasicInfo::default(); MAX_TEAMS],
            ..Self::default()
        }
    }

    /// Returns `None` when the section header marks it empty.
    pub fn decode(
        section: &str,
        bytes: &[u8],
        version: Version,
        codec: &dyn Codec,
    ) -> Result<Option<Self>, CampaignError> {
        let Some(unframed) = unframe(section, bytes, HEADER, codec)? else {
            return Ok(None);
        };
        decode_body(section, version, &unframed.body, Self::parse).map(Some)
    }

    pub fn encode(&self, section: &str, codec: &dyn Codec) -> Result<Vec<u8>, CampaignError> {
        let body = encode_body(section, |out| self.emit_to_vec(out))?;
        frame(section, &body, 0, HEADER, codec)
    }

    /// Names of the teams the campaign counts as present.
    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        let teams = self.number_of_teams.clamp(0, MAX_TEAMS as i32) as usize;
        self.team_info.iter().take(teams).map(|t| t.name.as_str())
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let current_time = r.read_u32()?;
        let start_time = r.read_u32()?;
        let time_limit = r.read_u32()?;
        let victory_points = r.read_i32()?;
        let campaign_type = r.read_i32()?;
        let number_of_teams = r.read_i32()?;
        let aircraft = r.read_i32_array()?;
        let player_aircraft = r.read_i32_array()?;
        let te_team = r.read_i32()?;
        let team_points = r.read_i32_array()?;
        let flags = r.read_i32()?;
        let team_info = r.read_vec(MAX_TEAMS, TeamBasicInfo::parse)?;
        let last_major_event = r.read_u32()?;
        let last_resupply = r.read_u32()?;
        let last_repair = r.read_u32()?;
        let last_reinforcement = r.read_u32()?;
        let time_stamp = r.read_i16()?;
        let group = r.read_i16()?;
        let ground_ratio = r.read_i16()?;
        let air_ratio = r.read_i16()?;
        let air_defense_ratio = r.read_i16()?;
        let naval_ratio = r.read_i16()?;
        let brief = r.read_i16()?;
        let theater_size_x = r.read_i16()?;
        let theater_size_y = r.read_i16()?;
        let current_day = r.read_u8()?;
        let active_teams = r.read_u8()?;
        let day_zero = r.read_u8()?;
        let endgame_result = r.read_u8()?;
        let situation = r.read_u8()?;
        let enemy_air_exp = r.read_u8()?;
        let enemy_ad_exp = r.read_u8()?;
        let bullseye_name = r.read_u8()?;
        let bullseye_x = r.read_i16()?;
        let bullseye_y = r.read_i16()?;
        let theater_name = r.read_fixed_string(NAME_LEN)?;
        let scenario = r.read_fixed_string(NAME_LEN)?;
        let save_file = r.read_fixed_string(NAME_LEN)?;
        let ui_name = r.read_fixed_string(NAME_LEN)?;
        let player_squadron = r.read_identity()?;
        let recent_events = parse_event_list(r)?;
        let priority_events = parse_event_list(r)?;
        let map_size = r.read_i16()?;
        let campaign_map = r.read_bytes(map_size.max(0) as usize)?;
        let last_index_num = r.read_i16()?;
        let squadron_count = r.read_i16()?;
        let squadrons = r.read_vec(squadron_count.max(0) as usize, SquadInfo::parse)?;

        Ok(Self {
            current_time,
            start_time,
            time_limit,
            victory_points,
            campaign_type,
            number_of_teams,
            aircraft,
            player_aircraft,
            te_team,
            team_points,
            flags,
            team_info,
            last_major_event,
            last_resupply,
            last_repair,
            last_reinforcement,
            time_stamp,
            group,
            ground_ratio,
            air_ratio,
            air_defense_ratio,
            naval_ratio,
            brief,
            theater_size_x,
            theater_size_y,
            current_day,
            active_teams,
            day_zero,
            endgame_result,
            situation,
            enemy_air_exp,
            enemy_ad_exp,
            bullseye_name,
            bullseye_x,
            bullseye_y,
            theater_name,
            scenario,
            save_file,
            ui_name,
            player_squadron,
            recent_events,
            priority_events,
            campaign_map,
            last_index_num,
            squadrons,
            tempo: r.read_u8()?,
            creator_ip: r.read_i32()?,
            creation_time: r.read_i32()?,
            creation_rand: r.read_i32()?,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.team_info.len() != MAX_TEAMS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "campaign state needs {MAX_TEAMS} team info slots, has {}",
                    self.team_info.len()
                ),
            ));
        }

        out.put_u32(self.current_time);
        out.put_u32(self.start_time);
        out.put_u32(self.time_limit);
        out.put_i32(self.victory_points);
        out.put_i32(self.campaign_type);
        out.put_i32(self.number_of_teams);
        for v in self.aircraft {
            out.put_i32(v);
        }
        for v in self.player_aircraft {
            out.put_i32(v);
        }
        out.put_i32(self.te_team);
        for v in self.team_points {
            out.put_i32(v);
        }
        out.put_i32(self.flags);
        for info in &self.team_info {
            info.emit_to_vec(out);
        }
        out.put_u32(self.last_major_event);
        out.put_u32(self.last_resupply);
        out.put_u32(self.last_repair);
        out.put_u32(self.last_reinforcement);
        out.put_i16(self.time_stamp);
        out.put_i16(self.group);
        out.put_i16(self.ground_ratio);
        out.put_i16(self.air_ratio);
        out.put_i16(self.air_defense_ratio);
        out.put_i16(self.naval_ratio);
        out.put_i16(self.brief);
        out.put_i16(self.theater_size_x);
        out.put_i16(self.theater_size_y);
        out.put_u8(self.current_day);
        out.put_u8(self.active_teams);
        out.put_u8(self.day_zero);
        out.put_u8(self.endgame_result);
        out.put_u8(self.situation);
        out.put_u8(self.enemy_air_exp);
        out.put_u8(self.enemy_ad_exp);
        out.put_u8(self.bullseye_name);
        out.put_i16(self.bullseye_x);
        out.put_i16(self.bullseye_y);
        out.put_fixed_string(&self.theater_name, NAME_LEN);
        out.put_fixed_string(&self.scenario, NAME_LEN);
        out.put_fixed_string(&self.save_file, NAME_LEN);
        out.put_fixed_string(&self.ui_name, NAME_LEN);
        out.put_identity(self.player_squadron);
        emit_event_list(&self.recent_events, out)?;
        emit_event_list(&self.priority_events, out)?;
        out.put_i16(count_i16(self.campaign_map.len(), "campaign map byte")?);
        out.put_bytes(&self.campaign_map);
        out.put_i16(self.last_index_num);
        out.put_i16(count_i16(self.squadrons.len(), "squadron info")?);
        for squad in &self.squadrons {
            squad.emit_to_vec(out);
        }
        out.put_u8(self.tempo);
        out.put_i32(self.creator_ip);
        out.put_i32(self.creation_time);
        out.put_i32(self.creation_rand);
        Ok(())
    }
}
