//! Navigation-Status Trajectory Library
//!
//! Turns a stream of navigation-status messages into a styled GeoJSON trajectory.
//!
//! # Architecture
//!
//! Two stateless stages, run in sequence:
//! - [`Extractor`]: validates messages, groups coordinates per channel in arrival order,
//!   and reports rejected (malformed) messages in aggregate
//! - [`Renderer`]: classifies each point of one channel into a quality tier and emits one
//!   colored LineString feature per run of equal tiers
//!
//! Both stages return `None` for "nothing to render" instead of an empty structure.
//! Callers skip rendering when extraction yields `None`.
//!
//! # Example Usage
//!
//! ```no_run
//! use navsts_trajectory::{Extractor, LogReporter, MessageReader, Renderer, TrajectoryConfig};
//! use std::path::Path;
//!
//! let config = TrajectoryConfig::new().with_channel_filter(vec!["/nav/nav_sts"]);
//!
//! let messages = MessageReader::open(Path::new("run.jsonl"))
//!     .unwrap()
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! if let Some(extraction) = Extractor::new(config.clone()).extract(messages, &LogReporter) {
//!     if let Some(trajectory) = Renderer::new(config).render(&extraction) {
//!         println!("{}", serde_json::to_string(&trajectory).unwrap());
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod geojson;
pub mod quality;
pub mod reader;
pub mod renderer;
pub mod types;

// Re-export main types for convenience
pub use config::{TrajectoryConfig, DEFAULT_PALETTE, PALETTE_SIZE};
pub use extractor::{ErrorReporter, Extractor, LogReporter, NullReporter};
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use quality::QualityTier;
pub use reader::{MessageIterator, MessageReader};
pub use renderer::Renderer;
pub use types::{
    ChannelCoordinates, ChannelMap, CoordinateRecord, ErrorCounts, ExtractionResult, GeoPoint,
    NavMessage, RawMessage, Result, Timestamp, TrajectoryError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the extraction stage with default configuration, warning through `log`
pub fn extract<I>(messages: I) -> Option<ExtractionResult>
where
    I: IntoIterator<Item = NavMessage>,
{
    Extractor::default().extract(messages, &LogReporter)
}

/// Run the rendering stage with default configuration
pub fn render(extraction: &ExtractionResult) -> Option<FeatureCollection> {
    Renderer::default().render(extraction)
}
