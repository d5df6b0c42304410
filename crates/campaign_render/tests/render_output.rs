use campaign_core::core_api::{Engine, Session};
use campaign_core::sections::{CampaignEvent, CampaignEvents, CampaignState, SquadInfo};
use campaign_core::{ContainerBuilder, Lzss, UnitClassTable};
use campaign_render::{
    JsonStyle, TextRenderOptions, render_json_sections, render_json_summary,
    render_text_summary, render_text_summary_with_options,
};

fn session() -> Session {
    let mut state = CampaignState::new();
    state.current_time = 2 * 86_400_000 + 9 * 3_600_000 + 30 * 60_000;
    state.number_of_teams = 2;
    state.team_info[0].name = "Neutral".to_string();
    state.team_info[1].name = "USA".to_string();
    state.theater_name = "Korea".to_string();
    state.scenario = "Tiger Spirit".to_string();
    state.squadrons.push(SquadInfo {
        squadron_name: "80th FS".to_string(),
        airbase_name: "Kunsan AB".to_string(),
        current_strength: 18,
        ..SquadInfo::default()
    });

    let events = CampaignEvents {
        events: vec![CampaignEvent { id: 3, flags: 1 }],
    };

    let bytes = ContainerBuilder::new()
        .section("tiger.ver", b"79".to_vec())
        .section("tiger.cmp", state.encode("tiger.cmp", &Lzss).expect("cmp"))
        .section("tiger.evt", events.encode("tiger.evt").expect("evt"))
        .build()
        .expect("container");

    Engine::new()
        .open_bytes(bytes, &UnitClassTable::new())
        .expect("container should parse")
}

#[test]
fn summary_json_uses_canonical_top_level_order() {
    let value = render_json_summary(&session(), JsonStyle::CanonicalV1);
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(
        keys,
        vec![
            "version",
            "campaign_time",
            "theater",
            "scenario",
            "teams",
            "counts",
            "sections",
        ]
    );
    assert_eq!(value["version"], 79);
    assert_eq!(value["campaign_time"]["day"], 2);
    assert_eq!(value["campaign_time"]["hour"], 9);
    assert_eq!(value["teams"][1], "USA");
    assert_eq!(value["counts"]["events"], 1);
}

#[test]
fn sections_json_lists_directory_in_order() {
    let value = render_json_sections(&session().snapshot().sections, JsonStyle::CanonicalV1);
    let sections = value.as_array().expect("json should be an array");
    let names: Vec<&str> = sections
        .iter()
        .map(|s| s["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["tiger.ver", "tiger.cmp", "tiger.evt"]);
    assert_eq!(sections[0]["offset"], 4);
    assert_eq!(sections[1]["kind"], "CMP");
}

#[test]
fn text_summary_contains_expected_sections() {
    let rendered = render_text_summary(&session());
    assert!(rendered.starts_with("FALCON CAMPAIGN\n"));
    assert!(rendered.contains("Theater:  Korea"));
    assert!(rendered.contains("Time:     day 2 09:30:00"));
    assert!(rendered.contains(" ::: Teams :::"));
    assert!(rendered.contains("  1: USA"));
    assert!(!rendered.contains(" ::: Sections :::"));
}

#[test]
fn verbose_summary_adds_sections_and_squadrons() {
    let rendered =
        render_text_summary_with_options(&session(), TextRenderOptions { verbose: true });
    assert!(rendered.contains(" ::: Sections :::"));
    assert!(rendered.contains("tiger.cmp"));
    assert!(rendered.contains("80th FS"));
    assert!(rendered.contains("Kunsan AB"));
}
