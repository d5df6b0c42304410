use serde::Serialize;

const MS_PER_SECOND: u32 = 1_000;
const MS_PER_MINUTE: u32 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u32 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u32 = 24 * MS_PER_HOUR;

/// Campaign clock split from its millisecond count. Day 0 starts at 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CampaignTime {
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CampaignTime {
    pub fn from_millis(ms: u32) -> Self {
        Self {
            day: ms / MS_PER_DAY,
            hour: (ms % MS_PER_DAY / MS_PER_HOUR) as u8,
            minute: (ms % MS_PER_HOUR / MS_PER_MINUTE) as u8,
            second: (ms % MS_PER_MINUTE / MS_PER_SECOND) as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub name: String,
    /// Decoder token, or `None` for sections kept as raw bytes.
    pub kind: Option<&'static str>,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub objectives: usize,
    pub objective_deltas: usize,
    pub teams: usize,
    pub units: usize,
    pub flights: usize,
    pub squadrons: usize,
    pub events: usize,
    pub pilots: usize,
    pub persistents: usize,
    pub primary_objectives: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// `None` when the container has no VER section.
    pub version: Option<i32>,
    pub campaign_time: Option<CampaignTime>,
    pub theater: Option<String>,
    pub scenario: Option<String>,
    pub team_names: Vec<String>,
    pub sections: Vec<SectionEntry>,
    pub counts: RecordCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_time_splits_millis() {
        let ms = 2 * MS_PER_DAY + 7 * MS_PER_HOUR + 30 * MS_PER_MINUTE + 15 * MS_PER_SECOND + 999;
        assert_eq!(
            CampaignTime::from_millis(ms),
            CampaignTime {
                day: 2,
                hour: 7,
                minute: 30,
                second: 15,
            }
        );
    }
}
