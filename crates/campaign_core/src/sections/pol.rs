use std::io;

use crate::error::CampaignError;
use crate::identity::Identity;
use crate::version::Version;
use crate::writer::{PutLe, count_i16};

use super::{SectionReader, decode_body, encode_body};

pub const TEAM_BITS: u32 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamPriority {
    pub priority: i16,
    pub flags: u8,
}

/// A primary objective with one priority entry per team in the mask, in
/// ascending bit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryObjective {
    pub id: Identity,
    pub priorities: Vec<TeamPriority>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryObjectives {
    pub team_mask: u8,
    pub objectives: Vec<PrimaryObjective>,
}

impl PrimaryObjectives {
    pub fn decode(section: &str, bytes: &[u8], version: Version) -> Result<Self, CampaignError> {
        decode_body(section, version, bytes, Self::parse)
    }

    pub fn encode(&self, section: &str) -> Result<Vec<u8>, CampaignError> {
        encode_body(section, |out| self.emit_to_vec(out))
    }

    /// Number of priority entries each objective carries.
    pub fn teams_in_mask(&self) -> usize {
        self.team_mask.count_ones() as usize
    }

    fn parse(r: &mut SectionReader<'_>) -> io::Result<Self> {
        let team_mask = r.read_u8()?;
        let count = r.read_i16()?;
        let objectives = r.read_vec(count.max(0) as usize, |r| {
            let id = r.read_identity()?;
            // Flags are kept per team. The game's own reader keeps one flags
            // byte per objective (the last team's) and writes it for every
            // team, so a mask with differing flags does not survive its save.
            let mut priorities = Vec::with_capacity(team_mask.count_ones() as usize);
            for bit in 0..TEAM_BITS {
                if team_mask & (1 << bit) != 0 {
                    priorities.push(TeamPriority {
                        priority: r.read_i16()?,
                        flags: r.read_u8()?,
                    });
                }
            }
            Ok(PrimaryObjective { id, priorities })
        })?;
        Ok(Self {
            team_mask,
            objectives,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_u8(self.team_mask);
        out.put_i16(count_i16(self.objectives.len(), "primary objective")?);
        let expected = self.teams_in_mask();
        for objective in &self.objectives {
            if objective.priorities.len() != expected {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "primary objective {} has {} team priorities, mask {:#04x} needs {}",
                        objective.id,
                        objective.priorities.len(),
                        self.team_mask,
                        expected
                    ),
                ));
            }
            out.put_identity(objective.id);
            for entry in &objective.priorities {
                out.put_i16(entry.priority);
                out.put_u8(entry.flags);
            }
        }
        Ok(())
    }
}
