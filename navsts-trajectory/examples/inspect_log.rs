//! Standalone message log inspector
//!
//! Prints per-channel point counts and the tier segments that would be rendered,
//! without writing any files.
//!
//! Usage:
//!   inspect_log <log.jsonl> [--channel <name>] [--verbose]

use navsts_trajectory::{
    Extractor, LogReporter, MessageReader, QualityTier, Renderer, TrajectoryConfig,
};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <log.jsonl> [--channel <name>] [--verbose]", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut config = TrajectoryConfig::new();
    let mut verbose = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--channel" => {
                i += 1;
                if i < args.len() {
                    config = config.with_channel(args[i].clone());
                }
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("=== NavSts Log Inspector ===");
    println!("Log file: {:?}", log_file);

    let messages = MessageReader::open(&log_file)?.collect::<Result<Vec<_>, _>>()?;
    println!("Messages: {}", messages.len());

    let Some(extraction) = Extractor::new(config.clone()).extract(messages, &LogReporter) else {
        println!("No valid navigation messages");
        return Ok(());
    };

    println!("\nChannels:");
    for (channel, records) in extraction.coordinates.iter() {
        println!("  {}: {} points", channel, records.len());
    }

    let Some(trajectory) = Renderer::new(config).render(&extraction) else {
        println!("\nSelected channel has no points");
        return Ok(());
    };

    println!("\nSegments: {}", trajectory.features.len());
    if verbose {
        for (index, feature) in trajectory.features.iter().enumerate() {
            let coordinates = feature.coordinates();
            println!(
                "  #{:<4} {:<8} {:>6} points, starts at [{:.6}, {:.6}]",
                index,
                feature.color(),
                coordinates.len(),
                coordinates[0][0],
                coordinates[0][1]
            );
        }
    }

    if let Some((_, records)) = extraction.first_channel() {
        let mut per_tier = [0usize; navsts_trajectory::PALETTE_SIZE];
        for record in records {
            per_tier[QualityTier::from_status(record.status).palette_index()] += 1;
        }
        println!("\nPoints per tier (first channel):");
        for (index, count) in per_tier.iter().enumerate() {
            println!("  tier {}: {}", index + 1, count);
        }
    }

    Ok(())
}
