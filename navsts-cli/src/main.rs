//! NavSts Trajectory CLI Application
//!
//! Command-line front end for the navsts-trajectory library. It stands in for the
//! message pipeline:
//! - Reads navigation messages from JSON Lines logs
//! - Runs extraction and rendering once per input file (files in parallel)
//! - Writes the GeoJSON trajectory (and optionally the extraction) per file

use anyhow::{Context, Result};
use clap::Parser;
use navsts_trajectory::{
    ExtractionResult, Extractor, MessageReader, NavMessage, Renderer, TrajectoryConfig,
};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::AppConfig;
use report::{FileSummary, SummaryReporter};

/// NavSts Trajectory - Render navigation-status logs as GeoJSON
#[derive(Parser, Debug)]
#[command(name = "navsts")]
#[command(about = "Render navigation-status message logs as styled GeoJSON trajectories", long_about = None)]
#[command(version)]
struct Args {
    /// JSON Lines message log(s) to process
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (navsts.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Render this channel instead of the first one seen
    #[arg(long, value_name = "CHANNEL")]
    channel: Option<String>,

    /// Only consider these channels (can be repeated)
    #[arg(long = "filter", value_name = "CHANNEL")]
    filter: Vec<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Also write the per-channel extraction as <stem>.navsts.json
    #[arg(long)]
    extraction: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("NavSts Trajectory CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using trajectory library v{}", navsts_trajectory::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let app_config = merge_args(app_config, &args);
    let trajectory_config = app_config.trajectory_config()?;
    log::debug!("Effective configuration: {:?}", trajectory_config);

    if app_config.input.files.is_empty() {
        println!("NavSts Trajectory - No input specified");
        println!("\nQuick Start:");
        println!("  navsts run.jsonl");
        println!("  navsts run.jsonl --channel /nav/nav_sts --extraction -o out/");
        println!("\nWith a configuration file:");
        println!("  navsts --config navsts.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    let results: Vec<(PathBuf, Result<FileSummary>)> = app_config
        .input
        .files
        .par_iter()
        .map(|path| (path.clone(), process_file(path, &app_config, &trajectory_config)))
        .collect();

    let mut summaries = Vec::new();
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                log::error!("Failed to process {:?}: {:#}", path, e);
                failures.push((path, e));
            }
        }
    }

    if !args.quiet {
        report::print_summary(&summaries, &failures);
    }

    if !failures.is_empty() {
        anyhow::bail!("{} of {} file(s) failed", failures.len(), app_config.input.files.len());
    }

    Ok(())
}

/// Command-line flags override the configuration file
fn merge_args(mut config: AppConfig, args: &Args) -> AppConfig {
    if !args.inputs.is_empty() {
        config.input.files = args.inputs.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = Some(dir.clone());
    }
    if let Some(channel) = &args.channel {
        config.filtering.channel = Some(channel.clone());
    }
    if !args.filter.is_empty() {
        config.filtering.channels = Some(args.filter.clone());
    }
    config.output.pretty |= args.pretty;
    config.output.write_extraction |= args.extraction;
    config
}

/// Run extraction and rendering for one message log
fn process_file(path: &Path, app: &AppConfig, config: &TrajectoryConfig) -> Result<FileSummary> {
    let mut summary = FileSummary::new(path.to_path_buf());

    let messages = MessageReader::open(path)?
        .collect::<navsts_trajectory::Result<Vec<NavMessage>>>()
        .with_context(|| format!("Failed to read message log: {:?}", path))?;
    summary.messages = messages.len();

    if let (Some(first), Some(last)) = (messages.first(), messages.last()) {
        log::info!(
            "{:?}: {} messages from {} to {}",
            path,
            messages.len(),
            first.timestamp(),
            last.timestamp()
        );
    }

    let reporter = SummaryReporter::default();
    let extraction = Extractor::new(config.clone()).extract(messages, &reporter);
    summary.rejected = reporter.into_counts();

    let Some(extraction) = extraction else {
        log::warn!("{:?}: no valid navigation messages, nothing to render", path);
        return Ok(summary);
    };
    summary.channels = extraction.coordinates.len();
    summary.points = extraction.point_count();

    if app.output.write_extraction {
        let out = output_path(path, app, "navsts.json");
        write_json(&out, &extraction, app.output.pretty)?;
        summary.extraction_path = Some(out);
    }

    render_to_file(path, &extraction, app, config, &mut summary)?;
    Ok(summary)
}

fn render_to_file(
    path: &Path,
    extraction: &ExtractionResult,
    app: &AppConfig,
    config: &TrajectoryConfig,
    summary: &mut FileSummary,
) -> Result<()> {
    let Some(trajectory) = Renderer::new(config.clone()).render(extraction) else {
        log::warn!("{:?}: selected channel has no points, nothing to render", path);
        return Ok(());
    };
    summary.segments = trajectory.features.len();

    let out = output_path(path, app, "geojson");
    write_json(&out, &trajectory, app.output.pretty)?;
    log::info!("Wrote {} segment(s) to {:?}", trajectory.features.len(), out);
    summary.trajectory_path = Some(out);
    Ok(())
}

/// `<dir>/<input stem>.<extension>`
fn output_path(input: &Path, app: &AppConfig, extension: &str) -> PathBuf {
    let dir = app
        .output
        .dir
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    dir.join(format!("{}.{}", stem.to_string_lossy(), extension))
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let writer = BufWriter::new(file);
    let written = if pretty {
        serde_json::to_writer_pretty(writer, value)
    } else {
        serde_json::to_writer(writer, value)
    };
    written.with_context(|| format!("Failed to write {:?}", path))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // Module targets are only worth the noise when tracing
    let show_target = level == LevelFilter::Trace;

    Builder::new()
        .filter_level(level)
        .format(move |buf, record| {
            if show_target {
                writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
            } else {
                writeln!(buf, "[{}] {}", record.level(), record.args())
            }
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_next_to_input() {
        let app = AppConfig::default();
        let out = output_path(Path::new("logs/dive_01.jsonl"), &app, "geojson");
        assert_eq!(out, PathBuf::from("logs/dive_01.geojson"));
    }

    #[test]
    fn test_output_path_in_output_dir() {
        let mut app = AppConfig::default();
        app.output.dir = Some(PathBuf::from("out"));
        let out = output_path(Path::new("logs/dive_01.jsonl"), &app, "navsts.json");
        assert_eq!(out, PathBuf::from("out/dive_01.navsts.json"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let args = Args::parse_from(["navsts", "a.jsonl", "--channel", "/gps", "--pretty"]);
        let mut config = AppConfig::default();
        config.input.files = vec![PathBuf::from("b.jsonl")];

        let merged = merge_args(config, &args);
        assert_eq!(merged.input.files, vec![PathBuf::from("a.jsonl")]);
        assert_eq!(merged.filtering.channel.as_deref(), Some("/gps"));
        assert!(merged.output.pretty);
    }

    #[test]
    fn test_process_file_writes_trajectory_despite_nan_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dive.jsonl");
        std::fs::write(
            &input,
            concat!(
                r#"{"channel":"/nav","message":{"status":0,"global_position":{"latitude":1.0,"longitude":1.0},"altitude":0.0}}"#,
                "\n",
                r#"{"channel":"/nav","message":{"status":0,"global_position":{"latitude":NaN,"longitude":1.0},"altitude":0.0}}"#,
                "\n",
            ),
        )
        .unwrap();

        let mut app = AppConfig::default();
        app.output.write_extraction = true;
        let summary = process_file(&input, &app, &TrajectoryConfig::default()).unwrap();

        assert_eq!(summary.messages, 2);
        assert_eq!(summary.rejected.total(), 1);
        assert_eq!(summary.segments, 1);

        let written = std::fs::read_to_string(dir.path().join("dive.geojson")).unwrap();
        let trajectory: navsts_trajectory::FeatureCollection =
            serde_json::from_str(&written).unwrap();
        assert_eq!(trajectory.features[0].coordinates(), &[[1.0, 1.0]]);
        assert!(dir.path().join("dive.navsts.json").exists());
    }
}
