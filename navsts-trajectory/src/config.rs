//! Trajectory configuration types
//!
//! The configuration is intentionally small: which channels to consider, which one to
//! render, and the colors to render quality tiers with. Everything else is fixed behavior.

use serde::{Deserialize, Serialize};

/// Number of quality tiers, and therefore of palette entries
pub const PALETTE_SIZE: usize = 5;

/// Default tier colors: red, orange, blue, green, black
pub const DEFAULT_PALETTE: [&str; PALETTE_SIZE] = ["#f00", "#ffa500", "#00f", "#0f0", "#000"];

/// Configuration shared by the extractor and the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Optional: only consider messages from these channels
    #[serde(default)]
    pub channel_filter: Option<Vec<String>>,

    /// Optional: render this channel instead of the first inserted one
    #[serde(default)]
    pub channel: Option<String>,

    /// Colors indexed by palette index (tier - 1)
    #[serde(default = "default_palette")]
    pub palette: [String; PALETTE_SIZE],
}

fn default_palette() -> [String; PALETTE_SIZE] {
    DEFAULT_PALETTE.map(String::from)
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            channel_filter: None,
            channel: None,
            palette: default_palette(),
        }
    }
}

impl TrajectoryConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set channel filter
    pub fn with_channel_filter<S: Into<String>>(mut self, channels: Vec<S>) -> Self {
        self.channel_filter = Some(channels.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method: render a specific channel
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Builder method: replace the tier palette
    pub fn with_palette(mut self, palette: [String; PALETTE_SIZE]) -> Self {
        self.palette = palette;
        self
    }

    /// Check if a channel should be processed
    pub fn should_process_channel(&self, channel: &str) -> bool {
        match &self.channel_filter {
            Some(channels) => channels.iter().any(|c| c == channel),
            None => true,
        }
    }
}
