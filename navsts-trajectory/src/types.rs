//! Core types for the navigation-status trajectory library
//!
//! This module defines the records flowing through the two processing stages:
//! raw navigation messages on the way in, validated coordinate records grouped per
//! channel in the middle. The GeoJSON output types live in [`crate::geojson`].

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, TrajectoryError>;

/// Errors that can occur while reading messages or writing results
///
/// Malformed navigation records are never errors: they are dropped and counted by the
/// extractor. Only I/O and wire-format problems surface here.
#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("Invalid message on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to open message log: {0}")]
    LogOpenError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Geographic position of a navigation message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default = "nan", deserialize_with = "null_as_nan")]
    pub latitude: f64,
    #[serde(default = "nan", deserialize_with = "null_as_nan")]
    pub longitude: f64,
}

/// A navigation-status record as delivered by the message pipeline
///
/// Absent or `null` floats on the wire are read as NaN, an absent status stays `None`.
/// Both are rejected by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Fix quality bitmask, absent on malformed records
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default = "nan_point")]
    pub global_position: GeoPoint,
    #[serde(default = "nan", deserialize_with = "null_as_nan")]
    pub altitude: f64,
}

impl RawMessage {
    pub const STATUS_FAULT: u8 = 0;
    pub const STATUS_LOCAL_FRAME_OK: u8 = 1;
    pub const STATUS_GLOBAL_FRAME_OK: u8 = 2;
    pub const STATUS_POSITION_OK: u8 = 3;
    pub const STATUS_VELOCITY_OK: u8 = 4;
    pub const STATUS_ESTIMATION_ERROR_OK: u8 = 8;
    pub const STATUS_ALL_OK: u8 = 15;

    /// Create a message with a status and a full position
    pub fn new(status: u8, longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            status: Some(status),
            global_position: GeoPoint {
                latitude,
                longitude,
            },
            altitude,
        }
    }

    /// True if the record carries a status and no NaN in longitude, latitude or altitude
    pub fn is_valid(&self) -> bool {
        self.status.is_some()
            && !self.global_position.longitude.is_nan()
            && !self.global_position.latitude.is_nan()
            && !self.altitude.is_nan()
    }

    /// Convert into a coordinate record, or `None` if the record is malformed
    pub fn to_record(&self) -> Option<CoordinateRecord> {
        if !self.is_valid() {
            return None;
        }
        let status = self.status?;
        Some(CoordinateRecord::new(
            status,
            self.global_position.longitude,
            self.global_position.latitude,
        ))
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn nan_point() -> GeoPoint {
    GeoPoint {
        latitude: f64::NAN,
        longitude: f64::NAN,
    }
}

fn null_as_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One `(channel, message, timestamp)` triple from the message pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavMessage {
    /// Opaque source identifier (e.g. a topic name)
    pub channel: String,
    /// Timestamp in nanoseconds since epoch
    #[serde(default)]
    pub timestamp_ns: u64,
    pub message: RawMessage,
}

impl NavMessage {
    pub fn new(channel: impl Into<String>, message: RawMessage, timestamp_ns: u64) -> Self {
        Self {
            channel: channel.into(),
            timestamp_ns,
            message,
        }
    }

    /// Convert timestamp from nanoseconds to DateTime<Utc>
    pub fn timestamp(&self) -> Timestamp {
        let secs = (self.timestamp_ns / 1_000_000_000) as i64;
        let nsecs = (self.timestamp_ns % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nsecs).unwrap_or_default()
    }
}

/// A validated `(status, (longitude, latitude))` pair
///
/// Serialized as `[status, [longitude, latitude]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u8, [f64; 2])", into = "(u8, [f64; 2])")]
pub struct CoordinateRecord {
    pub status: u8,
    pub longitude: f64,
    pub latitude: f64,
}

impl CoordinateRecord {
    pub fn new(status: u8, longitude: f64, latitude: f64) -> Self {
        Self {
            status,
            longitude,
            latitude,
        }
    }

    /// Position in GeoJSON axis order
    pub fn position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<(u8, [f64; 2])> for CoordinateRecord {
    fn from((status, [longitude, latitude]): (u8, [f64; 2])) -> Self {
        Self::new(status, longitude, latitude)
    }
}

impl From<CoordinateRecord> for (u8, [f64; 2]) {
    fn from(record: CoordinateRecord) -> Self {
        (record.status, record.position())
    }
}

/// Insertion-ordered map from channel to values
///
/// Channel counts per run are small, so lookups are linear. Serializes as a JSON object
/// whose keys keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> ChannelMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, channel: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(name, _)| name == channel)
            .map(|(_, value)| value)
    }

    /// Mutable access to a channel's value, inserting `V::default()` on first use
    pub fn entry_or_default(&mut self, channel: &str) -> &mut V
    where
        V: Default,
    {
        let index = match self.entries.iter().position(|(name, _)| name == channel) {
            Some(index) => index,
            None => {
                self.entries.push((channel.to_string(), V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// First inserted channel
    pub fn first(&self) -> Option<(&str, &V)> {
        self.entries
            .first()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<V> Default for ChannelMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for ChannelMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (channel, value) in iter {
            match map.entries.iter_mut().find(|(name, _)| *name == channel) {
                Some(entry) => entry.1 = value,
                None => map.entries.push((channel, value)),
            }
        }
        map
    }
}

impl<V: Serialize> Serialize for ChannelMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (channel, value) in &self.entries {
            map.serialize_entry(channel, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for ChannelMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ChannelMapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for ChannelMapVisitor<V> {
            type Value = ChannelMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map keyed by channel name")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((channel, value)) = access.next_entry::<String, V>()? {
                    entries.push((channel, value));
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(ChannelMapVisitor(std::marker::PhantomData))
    }
}

/// Channel → ordered coordinate records (arrival order)
pub type ChannelCoordinates = ChannelMap<Vec<CoordinateRecord>>;

/// Channel → number of rejected messages
pub type ErrorCounts = ChannelMap<usize>;

impl ErrorCounts {
    /// Total rejected messages over all channels
    pub fn total(&self) -> usize {
        self.iter().map(|(_, count)| *count).sum()
    }
}

impl fmt::Display for ErrorCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (channel, count) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", channel, count)?;
            first = false;
        }
        Ok(())
    }
}

/// Output of the extraction stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub coordinates: ChannelCoordinates,
}

impl ExtractionResult {
    /// Total number of valid points over all channels
    pub fn point_count(&self) -> usize {
        self.coordinates.iter().map(|(_, records)| records.len()).sum()
    }

    /// Records of the first inserted channel
    pub fn first_channel(&self) -> Option<(&str, &[CoordinateRecord])> {
        self.coordinates
            .first()
            .map(|(channel, records)| (channel, records.as_slice()))
    }
}
