//! Per-file run summaries

use navsts_trajectory::{ErrorCounts, ErrorReporter, LogReporter};
use std::cell::RefCell;
use std::path::PathBuf;

/// Forwards rejected-message reports to the log and keeps them for the summary
#[derive(Default)]
pub struct SummaryReporter {
    counts: RefCell<ErrorCounts>,
}

impl SummaryReporter {
    pub fn into_counts(self) -> ErrorCounts {
        self.counts.into_inner()
    }
}

impl ErrorReporter for SummaryReporter {
    fn report(&self, counts: &ErrorCounts) {
        LogReporter.report(counts);
        *self.counts.borrow_mut() = counts.clone();
    }
}

/// What happened to one input file
#[derive(Debug, Default)]
pub struct FileSummary {
    pub input: PathBuf,
    pub messages: usize,
    pub rejected: ErrorCounts,
    pub channels: usize,
    pub points: usize,
    pub segments: usize,
    pub trajectory_path: Option<PathBuf>,
    pub extraction_path: Option<PathBuf>,
}

impl FileSummary {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }
}

/// Print the summary of all processed files
pub fn print_summary(summaries: &[FileSummary], failures: &[(PathBuf, anyhow::Error)]) {
    println!("\n=== TRAJECTORY SUMMARY ===");
    for summary in summaries {
        println!("\n{:?}", summary.input);
        println!("  Messages read:    {}", summary.messages);
        println!("  Rejected:         {}", summary.rejected.total());
        for (channel, count) in summary.rejected.iter() {
            println!("    {}: {}", channel, count);
        }
        println!("  Channels:         {}", summary.channels);
        println!("  Valid points:     {}", summary.points);
        println!("  Segments:         {}", summary.segments);
        match &summary.trajectory_path {
            Some(path) => println!("  Trajectory:       {:?}", path),
            None => println!("  Trajectory:       (no data)"),
        }
        if let Some(path) = &summary.extraction_path {
            println!("  Extraction:       {:?}", path);
        }
    }

    if !failures.is_empty() {
        println!("\nFailed files:");
        for (path, err) in failures {
            println!("  {:?}: {:#}", path, err);
        }
    }
}
