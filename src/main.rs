//! Field inspection CLI
//!
//! Usage:
//!   field-inspect [OPTIONS] <FILE>
//!
//! Options:
//!   -s, --settings <FILE>    Field settings file (TOML format)
//!   --at <X,Y>               Hit-test every field against a point
//!   --accuracy <N>           Hit-test tolerance in internal units
//!   -h, --help               Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use schematic_fields::{
    format_report, inspect_with_config, FieldSettings, InspectConfig, Point,
};

#[derive(Parser)]
#[command(name = "field-inspect")]
#[command(about = "Resolve and place the fields of a schematic scene")]
struct Cli {
    /// Scene file (TOML format)
    input: PathBuf,

    /// Field settings file (TOML format)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Hit-test every field against this point, written as X,Y
    #[arg(long, value_parser = parse_point)]
    at: Option<Point>,

    /// Hit-test tolerance in internal units
    #[arg(long, default_value_t = 0)]
    accuracy: i64,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x '{}': {}", x, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y '{}': {}", y, e))?;
    Ok(Point::new(x, y))
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => match FieldSettings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FieldSettings::default(),
    };

    let source = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let mut config = InspectConfig::new()
        .with_settings(settings)
        .with_accuracy(cli.accuracy);
    if let Some(point) = cli.at {
        config = config.with_hit_point(point);
    }

    match inspect_with_config(&source, &config) {
        Ok(reports) => println!("{}", format_report(&reports)),
        Err(e) => {
            let filename = cli.input.display().to_string();
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}
