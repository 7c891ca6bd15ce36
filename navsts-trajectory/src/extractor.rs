//! Extraction stage
//!
//! Validates navigation messages, groups the valid ones per channel in arrival order, and
//! tallies the rejected ones. Rejections are reported once, in aggregate, through an
//! injected [`ErrorReporter`].

use crate::config::TrajectoryConfig;
use crate::types::{ChannelCoordinates, ErrorCounts, ExtractionResult, NavMessage};

/// Sink for the aggregated rejected-message counts of one extraction
pub trait ErrorReporter {
    fn report(&self, counts: &ErrorCounts);
}

/// Reports rejected messages as a single `log::warn!` line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, counts: &ErrorCounts) {
        log::warn!("Skipped erroneous navigation messages: {}", counts);
    }
}

/// Discards reports
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&self, _counts: &ErrorCounts) {}
}

/// Extraction stage - groups valid coordinates per channel
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: TrajectoryConfig,
}

impl Extractor {
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    /// Extract per-channel coordinates from a message sequence
    ///
    /// Messages with a missing status or a NaN longitude, latitude or altitude are
    /// dropped and counted. Messages on channels excluded by the channel filter are
    /// skipped without being counted.
    ///
    /// # Returns
    /// * `Some(ExtractionResult)` with at least one channel holding at least one record
    /// * `None` if no message was valid
    pub fn extract<I>(&self, messages: I, reporter: &dyn ErrorReporter) -> Option<ExtractionResult>
    where
        I: IntoIterator<Item = NavMessage>,
    {
        let mut coordinates = ChannelCoordinates::new();
        let mut erroneous = ErrorCounts::new();

        for msg in messages {
            if !self.config.should_process_channel(&msg.channel) {
                log::trace!("Skipping message on filtered channel {}", msg.channel);
                continue;
            }

            match msg.message.to_record() {
                Some(record) => coordinates.entry_or_default(&msg.channel).push(record),
                None => *erroneous.entry_or_default(&msg.channel) += 1,
            }
        }

        if !erroneous.is_empty() {
            reporter.report(&erroneous);
        }

        if coordinates.is_empty() {
            log::debug!("No valid navigation messages");
            return None;
        }

        log::debug!(
            "Extracted coordinates for {} channel(s), {} rejected",
            coordinates.len(),
            erroneous.total()
        );
        Some(ExtractionResult { coordinates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoordinateRecord, RawMessage};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReporter {
        reports: RefCell<Vec<ErrorCounts>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, counts: &ErrorCounts) {
            self.reports.borrow_mut().push(counts.clone());
        }
    }

    fn nav(channel: &str, status: u8, lon: f64, lat: f64) -> NavMessage {
        NavMessage::new(channel, RawMessage::new(status, lon, lat, 0.0), 0)
    }

    fn malformed(channel: &str) -> NavMessage {
        NavMessage::new(channel, RawMessage::new(1, f64::NAN, 0.0, 0.0), 0)
    }

    #[test]
    fn test_groups_by_channel_in_arrival_order() {
        let messages = vec![
            nav("/b", 1, 1.0, 1.0),
            nav("/a", 2, 2.0, 2.0),
            nav("/b", 3, 3.0, 3.0),
        ];

        let result = Extractor::default().extract(messages, &NullReporter).unwrap();

        assert_eq!(result.coordinates.channels().collect::<Vec<_>>(), vec!["/b", "/a"]);
        assert_eq!(
            result.coordinates.get("/b").unwrap(),
            &vec![
                CoordinateRecord::new(1, 1.0, 1.0),
                CoordinateRecord::new(3, 3.0, 3.0)
            ]
        );
        assert_eq!(result.point_count(), 3);
    }

    #[test]
    fn test_rejections_reported_once_in_aggregate() {
        let messages = vec![
            malformed("/a"),
            nav("/a", 0, 0.0, 0.0),
            malformed("/b"),
            malformed("/a"),
        ];
        let reporter = RecordingReporter::default();

        let result = Extractor::default().extract(messages, &reporter).unwrap();

        let reports = reporter.reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].get("/a"), Some(&2));
        assert_eq!(reports[0].get("/b"), Some(&1));
        // "/b" only had rejections, so it must not appear in the output
        assert!(result.coordinates.get("/b").is_none());
    }

    #[test]
    fn test_no_report_without_rejections() {
        let reporter = RecordingReporter::default();
        Extractor::default().extract(vec![nav("/a", 0, 0.0, 0.0)], &reporter);
        assert!(reporter.reports.borrow().is_empty());
    }

    #[test]
    fn test_all_malformed_yields_no_data() {
        let reporter = RecordingReporter::default();
        let messages = vec![malformed("/a"), malformed("/a")];
        let result = Extractor::default().extract(messages, &reporter);

        assert!(result.is_none());
        assert_eq!(reporter.reports.borrow()[0].total(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_data() {
        assert!(Extractor::default().extract(Vec::new(), &NullReporter).is_none());
    }

    #[test]
    fn test_altitude_nan_rejected() {
        let msg = NavMessage::new("/a", RawMessage::new(2, 1.0, 1.0, f64::NAN), 0);
        assert!(Extractor::default().extract(vec![msg], &NullReporter).is_none());
    }

    #[test]
    fn test_channel_filter_skips_without_counting() {
        let config = TrajectoryConfig::new().with_channel_filter(vec!["/a"]);
        let reporter = RecordingReporter::default();

        let messages = vec![
            malformed("/b"),
            nav("/b", 0, 0.0, 0.0),
            nav("/a", 1, 1.0, 1.0),
        ];

        let result = Extractor::new(config).extract(messages, &reporter).unwrap();

        assert!(reporter.reports.borrow().is_empty());
        assert_eq!(result.coordinates.channels().collect::<Vec<_>>(), vec!["/a"]);
    }
}
