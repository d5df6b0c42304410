use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use campaign_core::class_table::{TYPE_CODE_BASE, kind};
use campaign_core::records::CampaignBase;
use campaign_core::sections::{CampaignEvent, CampaignEvents, UnitRoster};
use campaign_core::units::{Battalion, GroundUnit, UnitBase, UnitRecord, UnitVariant};
use campaign_core::{ClassEntry, ContainerBuilder, Domain, Identity, Lzss, UnitClassTable};
use serde_json::Value;

const CLASS_TABLE_JSON: &str =
    r#"{"entries":[{"index":0,"domain":"land","kind":"battalion"}]}"#;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_falcon-cam"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run falcon-cam CLI")
}

fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.{ext}", std::process::id(), nanos))
}

fn sample_container() -> Vec<u8> {
    let table = UnitClassTable::new().with(0, ClassEntry::new(Domain::Land, kind::BATTALION));
    let battalion = Battalion::new(GroundUnit::new(UnitBase::new(CampaignBase {
        id: Identity::new(4100, 1),
        owner: 2,
        ..CampaignBase::default()
    })));
    let roster = UnitRoster {
        units: vec![UnitRecord {
            type_code: TYPE_CODE_BASE,
            variant: UnitVariant::Battalion(battalion),
        }],
        stopped_at: None,
    };
    let events = CampaignEvents {
        events: vec![CampaignEvent { id: 1, flags: 0 }],
    };

    ContainerBuilder::new()
        .section("save1.ver", b"79".to_vec())
        .section("save1.evt", events.encode("save1.evt").expect("evt"))
        .section("save1.uni", roster.encode("save1.uni", &Lzss, &table).expect("uni"))
        .build()
        .expect("container")
}

struct Fixture {
    cam: PathBuf,
    class_table: PathBuf,
}

impl Fixture {
    fn new(prefix: &str) -> Self {
        let cam = temp_path(prefix, "cam");
        let class_table = temp_path(prefix, "json");
        fs::write(&cam, sample_container()).expect("container should be writable");
        fs::write(&class_table, CLASS_TABLE_JSON).expect("class table should be writable");
        Self { cam, class_table }
    }

    fn cam(&self) -> String {
        self.cam.to_string_lossy().to_string()
    }

    fn class_table(&self) -> String {
        self.class_table.to_string_lossy().to_string()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.cam);
        let _ = fs::remove_file(&self.class_table);
    }
}

#[test]
fn summary_json_counts_units_with_class_table() {
    let fixture = Fixture::new("falcon_cam_summary");
    let output = run_cli(&["--json", "--class-table", &fixture.class_table(), &fixture.cam()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["version"], 79);
    assert_eq!(json["counts"]["units"], 1);
    assert_eq!(json["counts"]["events"], 1);
}

#[test]
fn missing_class_table_drops_units_with_warning() {
    let fixture = Fixture::new("falcon_cam_no_table");
    let output = run_cli(&["--json", &fixture.cam()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["counts"]["units"], 0);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unit entry dropped"));
}

#[test]
fn debug_sections_json_lists_directory() {
    let fixture = Fixture::new("falcon_cam_sections");
    let output = run_cli(&["debug", "sections", "--json", &fixture.cam()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let sections = json.as_array().expect("sections should be an array");
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["kind"], "VER");
    assert_eq!(sections[2]["name"], "save1.uni");
}

#[test]
fn debug_roundtrip_reproduces_container() {
    let fixture = Fixture::new("falcon_cam_roundtrip");
    let out_path = temp_path("falcon_cam_roundtrip_out", "cam");
    let out = out_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "debug",
        "roundtrip",
        "--class-table",
        &fixture.class_table(),
        &fixture.cam(),
        "--output",
        &out,
    ]);
    assert!(output.status.success());

    let original = fs::read(&fixture.cam).expect("original readable");
    let written = fs::read(&out_path).expect("output readable");
    assert_eq!(written, original);

    let _ = fs::remove_file(&out_path);
}

#[test]
fn truncated_container_fails() {
    let fixture = Fixture::new("falcon_cam_truncated");
    let bytes = fs::read(&fixture.cam).expect("fixture readable");
    fs::write(&fixture.cam, &bytes[..bytes.len() - 6]).expect("truncate");

    let output = run_cli(&[&fixture.cam()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error parsing campaign file"));
}

#[test]
fn require_version_rejects_container_without_ver() {
    let path = temp_path("falcon_cam_no_ver", "cam");
    let bytes = ContainerBuilder::new()
        .section("save1.evt", vec![0, 0])
        .build()
        .expect("container");
    fs::write(&path, bytes).expect("writable");
    let p = path.to_string_lossy().to_string();

    assert!(run_cli(&[&p]).status.success());
    let strict = run_cli(&["--require-version", &p]);
    assert!(!strict.status.success());

    let _ = fs::remove_file(&path);
}

#[test]
fn debug_sections_does_not_decode_sections() {
    let path = temp_path("falcon_cam_bad_uni", "cam");
    let bytes = ContainerBuilder::new()
        .section("save1.ver", b"79".to_vec())
        .section("save1.uni", vec![0xff; 12])
        .build()
        .expect("container");
    fs::write(&path, bytes).expect("writable");
    let p = path.to_string_lossy().to_string();

    assert!(!run_cli(&[&p]).status.success());
    let output = run_cli(&["debug", "sections", "--json", &p]);
    assert!(output.status.success());
    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json[1]["name"], "save1.uni");
    assert_eq!(json[1]["size"], 12);

    let _ = fs::remove_file(&path);
}

#[test]
fn roundtrip_without_class_table_copies_roster() {
    let fixture = Fixture::new("falcon_cam_roundtrip_no_table");
    let out_path = temp_path("falcon_cam_roundtrip_no_table_out", "cam");
    let out = out_path.to_string_lossy().to_string();

    let output = run_cli(&["debug", "roundtrip", &fixture.cam(), "--output", &out]);
    assert!(output.status.success());
    let original = fs::read(&fixture.cam).expect("original readable");
    let written = fs::read(&out_path).expect("output readable");
    assert_eq!(written, original);

    let _ = fs::remove_file(&out_path);
}
