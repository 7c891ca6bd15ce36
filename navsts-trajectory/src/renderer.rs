//! Segmentation and rendering stage
//!
//! Splits one channel's coordinate sequence into maximal runs of equal quality tier and
//! emits one styled LineString feature per run. This is a run-length encoding of the tier
//! sequence: point order is preserved and concatenating the features' coordinates gives
//! back the input positions.

use crate::config::TrajectoryConfig;
use crate::geojson::{Feature, FeatureCollection};
use crate::quality::QualityTier;
use crate::types::{CoordinateRecord, ExtractionResult};

/// Segmentation state for a single render call
enum SegmentState {
    NoSegment,
    Segment { tier: QualityTier, feature: Feature },
}

/// Rendering stage - turns extracted coordinates into a GeoJSON FeatureCollection
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: TrajectoryConfig,
}

impl Renderer {
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    /// Render the configured channel, or the first inserted one if none is configured
    ///
    /// Only one channel is rendered; any others in the extraction are ignored.
    ///
    /// # Returns
    /// * `Some(FeatureCollection)` with at least one feature
    /// * `None` if the selected channel is missing or has no points
    pub fn render(&self, extraction: &ExtractionResult) -> Option<FeatureCollection> {
        match &self.config.channel {
            Some(channel) => self.render_channel(extraction, channel),
            None => {
                let (channel, records) = extraction.first_channel()?;
                log::debug!("Rendering first channel {}", channel);
                self.render_records(records)
            }
        }
    }

    /// Render a specific channel
    pub fn render_channel(
        &self,
        extraction: &ExtractionResult,
        channel: &str,
    ) -> Option<FeatureCollection> {
        match extraction.coordinates.get(channel) {
            Some(records) => self.render_records(records),
            None => {
                log::debug!("Channel {} not present in extraction", channel);
                None
            }
        }
    }

    /// Segment an ordered coordinate sequence into styled features
    pub fn render_records(&self, records: &[CoordinateRecord]) -> Option<FeatureCollection> {
        let mut features = Vec::new();
        let mut state = SegmentState::NoSegment;

        for record in records {
            let tier = QualityTier::from_status(record.status);
            state = match state {
                SegmentState::Segment {
                    tier: current,
                    mut feature,
                } if current == tier => {
                    feature.push(record.position());
                    SegmentState::Segment { tier, feature }
                }
                previous => {
                    if let SegmentState::Segment { feature, .. } = previous {
                        features.push(feature);
                    }
                    log::trace!("Opening segment at {}", tier);
                    SegmentState::Segment {
                        tier,
                        feature: Feature::line_string(
                            self.color(tier),
                            vec![record.position()],
                        ),
                    }
                }
            };
        }

        if let SegmentState::Segment { feature, .. } = state {
            features.push(feature);
        }

        if features.is_empty() {
            return None;
        }

        log::debug!("Rendered {} points into {} segment(s)", records.len(), features.len());
        Some(FeatureCollection { features })
    }

    fn color(&self, tier: QualityTier) -> &str {
        &self.config.palette[tier.palette_index()]
    }
}
