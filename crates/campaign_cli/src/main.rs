use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use campaign_core::core_api::{Engine, Session};
use campaign_core::{LoadOptions, UnitClassTable};
use campaign_render::{
    JsonStyle, TextRenderOptions, render_json_sections, render_json_summary,
    render_text_sections, render_text_summary_with_options,
};
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    #[arg(value_name = "FILE.CAM", required = true)]
    path: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    /// JSON class table used to decode the unit roster.
    #[arg(long = "class-table", value_name = "FILE.json", global = true)]
    class_table: Option<PathBuf>,
    /// Maximum type codes read from the unit roster.
    #[arg(long = "max-roster-scan", value_name = "N", global = true)]
    max_roster_scan: Option<usize>,
    /// Fail when the container has no VER section.
    #[arg(long = "require-version", global = true)]
    require_version: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Debug(DebugCommand),
}

#[derive(Debug, Subcommand)]
enum DebugCommand {
    /// List directory entries with offsets and sizes.
    Sections {
        #[arg(long)]
        json: bool,
        #[arg(value_name = "FILE.CAM")]
        path: PathBuf,
    },
    /// Decode, re-encode and write the container.
    Roundtrip {
        #[arg(value_name = "FILE.CAM")]
        path: PathBuf,
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
        /// Copy section bytes through instead of re-encoding them.
        #[arg(long)]
        unmodified: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let class_table = load_class_table(cli.class_table.as_deref());
    let engine = Engine::with_options(LoadOptions {
        max_roster_scan: cli.max_roster_scan,
        require_version: cli.require_version,
    });

    match &cli.command {
        Some(Command::Debug(DebugCommand::Sections { json, path })) => {
            let sections = engine.read_sections(read_file(path)).unwrap_or_else(|e| {
                eprintln!("Error reading campaign directory: {}", path.display());
                eprintln!("  {e}");
                process::exit(1);
            });
            if *json {
                print_json(&render_json_sections(&sections, JsonStyle::CanonicalV1));
            } else {
                print!("{}", render_text_sections(&sections));
            }
        }
        Some(Command::Debug(DebugCommand::Roundtrip {
            path,
            output,
            unmodified,
        })) => {
            let session = open_session(&engine, path, &class_table);
            let bytes = if *unmodified {
                session.to_bytes_unmodified()
            } else {
                session.to_bytes(&class_table)
            };
            let bytes = bytes.unwrap_or_else(|e| {
                eprintln!("Error encoding {}: {e}", path.display());
                process::exit(1);
            });
            fs::write(output, &bytes).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", output.display());
                process::exit(1);
            });
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        None => {
            let Some(path) = cli.path.as_deref() else {
                eprintln!("missing <FILE.CAM>");
                process::exit(2);
            };
            let session = open_session(&engine, path, &class_table);
            if cli.json {
                print_json(&render_json_summary(&session, JsonStyle::CanonicalV1));
            } else {
                let options = TextRenderOptions {
                    verbose: cli.verbose,
                };
                print!("{}", render_text_summary_with_options(&session, options));
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_class_table(path: Option<&Path>) -> UnitClassTable {
    let Some(path) = path else {
        tracing::debug!("no class table given, unit entries will be dropped");
        return UnitClassTable::new();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing class table {}: {e}", path.display());
        process::exit(1);
    })
}

fn open_session(engine: &Engine, path: &Path, class_table: &UnitClassTable) -> Session {
    engine.open_bytes(read_file(path), class_table).unwrap_or_else(|e| {
        eprintln!("Error parsing campaign file: {}", path.display());
        eprintln!("  {e}");
        process::exit(1);
    })
}

fn read_file(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    })
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}
