use campaign_core::core_api::{CoreErrorCode, Engine};
use campaign_core::Identity;
use campaign_core::sections::{
    CampaignEvent, CampaignEvents, CampaignState, PilotInfo, PilotRoster, PrimaryObjective,
    PrimaryObjectives, TeamPriority,
};
use campaign_core::{ContainerBuilder, LoadOptions, Lzss, UnitClassTable};

fn state() -> CampaignState {
    let mut state = CampaignState::new();
    state.current_time = 86_400_000 + 5 * 3_600_000 + 61_000;
    state.number_of_teams = 2;
    state.team_info[0].name = "Neutral".to_string();
    state.team_info[1].name = "Blue".to_string();
    state.theater_name = "Balkans".to_string();
    state.scenario = "Operation Allied Force".to_string();
    state
}

fn container() -> Vec<u8> {
    let events = CampaignEvents {
        events: vec![CampaignEvent { id: 1, flags: 0 }, CampaignEvent { id: 2, flags: 0 }],
    };
    let pilots = PilotRoster {
        pilots: vec![PilotInfo::default(); 3],
        callsigns: vec![],
    };
    ContainerBuilder::new()
        .section("bk.ver", b"72".to_vec())
        .section("bk.cmp", state().encode("bk.cmp", &Lzss).expect("cmp"))
        .section("bk.evt", events.encode("bk.evt").expect("evt"))
        .section("bk.plt", pilots.encode("bk.plt").expect("plt"))
        .build()
        .expect("container")
}

#[test]
fn snapshot_summarises_the_campaign() {
    let session = Engine::new()
        .open_bytes(container(), &UnitClassTable::new())
        .expect("open");
    let snapshot = session.snapshot();

    assert_eq!(snapshot.version, Some(72));
    let time = snapshot.campaign_time.expect("time");
    assert_eq!((time.day, time.hour, time.minute, time.second), (1, 5, 1, 1));
    assert_eq!(snapshot.theater.as_deref(), Some("Balkans"));
    assert_eq!(snapshot.scenario.as_deref(), Some("Operation Allied Force"));
    assert_eq!(snapshot.team_names[..2], ["Neutral".to_string(), "Blue".to_string()]);
    assert_eq!(snapshot.counts.events, 2);
    assert_eq!(snapshot.counts.pilots, 3);
    assert_eq!(snapshot.counts.units, 0);

    let kinds: Vec<Option<&str>> = snapshot.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, [Some("VER"), Some("CMP"), Some("EVT"), Some("PLT")]);
}

#[test]
fn session_edits_reach_the_encoded_bytes() {
    let table = UnitClassTable::new();
    let engine = Engine::new();
    let mut session = engine.open_bytes(container(), &table).expect("open");
    assert_eq!(session.to_bytes(&table).expect("encode"), container());

    if let Some(state) = session.campaign_mut().campaign.as_mut() {
        state.theater_name = "Korea".to_string();
    }
    let edited = session.to_bytes(&table).expect("encode");
    let reopened = engine.open_bytes(edited, &table).expect("reopen");
    assert_eq!(reopened.snapshot().theater.as_deref(), Some("Korea"));
    assert_eq!(session.snapshot().theater.as_deref(), Some("Balkans"));
}

#[test]
fn error_codes_follow_the_failure() {
    let table = UnitClassTable::new();
    let engine = Engine::new();

    let err = engine.open_bytes([1u8, 2], &table).expect_err("short file");
    assert_eq!(err.code, CoreErrorCode::Parse);

    let mut evt = CampaignEvents::default().encode("bk.evt").expect("evt");
    evt.extend_from_slice(&[0, 0]);
    let trailing = ContainerBuilder::new()
        .section("bk.evt", evt)
        .build()
        .expect("container");
    let err = engine.open_bytes(&trailing, &table).expect_err("trailing bytes");
    assert_eq!(err.code, CoreErrorCode::TruncatedStream);

    let strict = Engine::with_options(LoadOptions {
        require_version: true,
        ..LoadOptions::default()
    });
    let err = strict.open_bytes(&trailing, &table).expect_err("no VER");
    assert_eq!(err.code, CoreErrorCode::SectionNotFound);

    let mut cmp = state().encode("bk.cmp", &Lzss).expect("cmp");
    // Header plus the first few payload bytes.
    cmp.truncate(12);
    let broken = ContainerBuilder::new()
        .section("bk.cmp", cmp)
        .build()
        .expect("container");
    let err = engine.open_bytes(&broken, &table).expect_err("cut compressed stream");
    assert_eq!(err.code, CoreErrorCode::DecompressionFailed);
}

#[test]
fn encode_failures_keep_their_error_code() {
    let primaries = PrimaryObjectives {
        team_mask: 0b0000_0010,
        objectives: vec![PrimaryObjective {
            id: Identity::new(20, 1),
            priorities: vec![TeamPriority {
                priority: 3,
                flags: 1,
            }],
        }],
    };
    let bytes = ContainerBuilder::new()
        .section("bk.ver", b"72".to_vec())
        .section("bk.pol", primaries.encode("bk.pol").expect("pol"))
        .build()
        .expect("container");
    let table = UnitClassTable::new();
    let mut session = Engine::new().open_bytes(bytes, &table).expect("open");

    // Two teams in the mask but one priority per objective.
    if let Some(pol) = session.campaign_mut().primary_objectives.as_mut() {
        pol.team_mask = 0b0000_0110;
    }
    let err = session.to_bytes(&table).expect_err("mask disagrees with priorities");
    assert_eq!(err.code, CoreErrorCode::Parse);
    assert!(err.message.contains("bk.pol"));
}
