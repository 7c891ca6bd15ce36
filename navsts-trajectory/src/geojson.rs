//! GeoJSON output types
//!
//! Just enough of RFC 7946 for styled trajectories: a FeatureCollection of LineString
//! features, each carrying the non-standard `properties.style.color` extension read by
//! the visualization layer.

use serde::{Deserialize, Serialize};

/// `{"type": "FeatureCollection", "features": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// A single styled trajectory segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Positions in `[longitude, latitude]` order; a single position is allowed
    LineString { coordinates: Vec<[f64; 2]> },
}

impl Feature {
    /// Create a LineString feature with the given color
    pub fn line_string(color: impl Into<String>, coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            properties: Properties {
                style: Style {
                    color: color.into(),
                },
            },
            geometry: Geometry::LineString { coordinates },
        }
    }

    pub fn color(&self) -> &str {
        &self.properties.style.color
    }

    pub fn coordinates(&self) -> &[[f64; 2]] {
        match &self.geometry {
            Geometry::LineString { coordinates } => coordinates,
        }
    }

    fn coordinates_mut(&mut self) -> &mut Vec<[f64; 2]> {
        match &mut self.geometry {
            Geometry::LineString { coordinates } => coordinates,
        }
    }

    pub(crate) fn push(&mut self, position: [f64; 2]) {
        self.coordinates_mut().push(position);
    }
}

impl FeatureCollection {
    /// All positions of all features, in order
    pub fn positions(&self) -> impl Iterator<Item = &[f64; 2]> {
        self.features.iter().flat_map(|f| f.coordinates().iter())
    }
}
