use campaign_core::core_api::{CampaignTime, RecordCounts, SectionEntry, Session};
use serde_json::{Map as JsonMap, Value as JsonValue};

const NAME_COL_WIDTH: usize = 24;
const KIND_COL_WIDTH: usize = 6;
const NUMBER_COL_WIDTH: usize = 10;
const SQUADRON_COL_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    pub verbose: bool,
}

pub fn render_json_summary(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(summary_json(session)),
    }
}

pub fn render_json_sections(sections: &[SectionEntry], style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => sections_to_json(sections),
    }
}

pub fn render_text_summary(session: &Session) -> String {
    render_text_summary_with_options(session, TextRenderOptions::default())
}

pub fn render_text_summary_with_options(session: &Session, options: TextRenderOptions) -> String {
    let snapshot = session.snapshot();
    let mut out = String::new();

    line(&mut out, "FALCON CAMPAIGN");
    line(
        &mut out,
        &format!(
            "  Version:  {}",
            snapshot
                .version
                .map_or_else(|| "latest (no VER section)".to_string(), |v| v.to_string())
        ),
    );
    line(
        &mut out,
        &format!("  Theater:  {}", snapshot.theater.as_deref().unwrap_or("-")),
    );
    line(
        &mut out,
        &format!("  Scenario: {}", snapshot.scenario.as_deref().unwrap_or("-")),
    );
    line(
        &mut out,
        &format!(
            "  Time:     {}",
            snapshot
                .campaign_time
                .map_or_else(|| "-".to_string(), format_campaign_time)
        ),
    );
    line(&mut out, "");

    line(&mut out, " ::: Teams :::");
    if snapshot.team_names.is_empty() {
        line(&mut out, "  (none)");
    }
    for (index, name) in snapshot.team_names.iter().enumerate() {
        line(&mut out, &format!("  {index}: {name}"));
    }
    line(&mut out, "");

    line(&mut out, " ::: Records :::");
    for (label, count) in count_rows(&snapshot.counts) {
        line(&mut out, &format!("  {label:<20}{count:>8}"));
    }

    if options.verbose {
        line(&mut out, "");
        write_sections_table(&mut out, &snapshot.sections);
        write_squadrons(&mut out, session);
    }
    out
}

pub fn render_text_sections(sections: &[SectionEntry]) -> String {
    let mut out = String::new();
    write_sections_table(&mut out, sections);
    out
}

fn summary_json(session: &Session) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();

    out.insert(
        "version".to_string(),
        snapshot.version.map_or(JsonValue::Null, JsonValue::from),
    );
    out.insert(
        "campaign_time".to_string(),
        match snapshot.campaign_time {
            Some(time) => campaign_time_to_json(time),
            None => JsonValue::Null,
        },
    );
    out.insert(
        "theater".to_string(),
        snapshot
            .theater
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    out.insert(
        "scenario".to_string(),
        snapshot
            .scenario
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    out.insert(
        "teams".to_string(),
        JsonValue::Array(
            snapshot
                .team_names
                .iter()
                .cloned()
                .map(JsonValue::String)
                .collect(),
        ),
    );
    out.insert("counts".to_string(), counts_to_json(&snapshot.counts));
    out.insert("sections".to_string(), sections_to_json(&snapshot.sections));
    out
}

fn campaign_time_to_json(time: CampaignTime) -> JsonValue {
    let mut obj = JsonMap::new();
    obj.insert("day".to_string(), JsonValue::from(time.day));
    obj.insert("hour".to_string(), JsonValue::from(time.hour));
    obj.insert("minute".to_string(), JsonValue::from(time.minute));
    obj.insert("second".to_string(), JsonValue::from(time.second));
    JsonValue::Object(obj)
}

fn counts_to_json(counts: &RecordCounts) -> JsonValue {
    let mut obj = JsonMap::new();
    for (label, count) in count_rows(counts) {
        obj.insert(label.to_string(), JsonValue::from(count));
    }
    JsonValue::Object(obj)
}

fn sections_to_json(sections: &[SectionEntry]) -> JsonValue {
    JsonValue::Array(
        sections
            .iter()
            .map(|s| {
                let mut obj = JsonMap::new();
                obj.insert("name".to_string(), JsonValue::String(s.name.clone()));
                obj.insert(
                    "kind".to_string(),
                    s.kind
                        .map_or(JsonValue::Null, |k| JsonValue::String(k.to_string())),
                );
                obj.insert("offset".to_string(), JsonValue::from(s.offset));
                obj.insert("size".to_string(), JsonValue::from(s.size));
                JsonValue::Object(obj)
            })
            .collect(),
    )
}

fn count_rows(counts: &RecordCounts) -> [(&'static str, usize); 10] {
    [
        ("objectives", counts.objectives),
        ("objective_deltas", counts.objective_deltas),
        ("teams", counts.teams),
        ("units", counts.units),
        ("flights", counts.flights),
        ("squadrons", counts.squadrons),
        ("events", counts.events),
        ("pilots", counts.pilots),
        ("persistents", counts.persistents),
        ("primary_objectives", counts.primary_objectives),
    ]
}

fn write_sections_table(out: &mut String, sections: &[SectionEntry]) {
    line(out, " ::: Sections :::");
    line(
        out,
        &format!(
            "  {:<NAME_COL_WIDTH$}{:<KIND_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}",
            "Name", "Kind", "Offset", "Size"
        ),
    );
    for s in sections {
        line(
            out,
            &format!(
                "  {:<NAME_COL_WIDTH$}{:<KIND_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}",
                fit_column(&s.name, NAME_COL_WIDTH - 1),
                s.kind.unwrap_or("-"),
                s.offset,
                s.size
            ),
        );
    }
}

fn write_squadrons(out: &mut String, session: &Session) {
    let Some(state) = session.campaign().campaign.as_ref() else {
        return;
    };
    if state.squadrons.is_empty() {
        return;
    }
    line(out, "");
    line(out, " ::: Squadrons :::");
    for squad in &state.squadrons {
        line(
            out,
            &format!(
                "  {:<SQUADRON_COL_WIDTH$}{:<SQUADRON_COL_WIDTH$}{:>4}",
                fit_column(&squad.squadron_name, SQUADRON_COL_WIDTH - 1),
                fit_column(&squad.airbase_name, SQUADRON_COL_WIDTH - 1),
                squad.current_strength
            ),
        );
    }
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn format_campaign_time(time: CampaignTime) -> String {
    format!(
        "day {} {:02}:{:02}:{:02}",
        time.day, time.hour, time.minute, time.second
    )
}
