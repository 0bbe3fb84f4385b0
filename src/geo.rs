//! State boundary polygons for the choropleth map.
//!
//! Features are keyed by their `properties.st_nm` value, which is the same
//! spelling the recipe table uses in its `state` column.

use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Property holding the state name in the boundary file.
pub const STATE_NAME_KEY: &str = "st_nm";

/// Closed ring of (longitude, latitude) points.
pub type Ring = Vec<(f64, f64)>;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: HashMap<String, serde_json::Value>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

type PolygonCoords = Vec<Vec<Vec<f64>>>;

/// Lon/lat bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn around(points: impl Iterator<Item = (f64, f64)>) -> Option<Self> {
        points.fold(None, |acc: Option<Bounds>, (lon, lat)| {
            Some(match acc {
                None => Bounds {
                    min_lon: lon,
                    max_lon: lon,
                    min_lat: lat,
                    max_lat: lat,
                },
                Some(b) => Bounds {
                    min_lon: b.min_lon.min(lon),
                    max_lon: b.max_lon.max(lon),
                    min_lat: b.min_lat.min(lat),
                    max_lat: b.max_lat.max(lat),
                },
            })
        })
    }
}

fn outer_ring(rings: PolygonCoords) -> Option<Ring> {
    let ring: Ring = rings
        .into_iter()
        .next()?
        .into_iter()
        .filter_map(|p| match p.as_slice() {
            [lon, lat, ..] => Some((*lon, *lat)),
            _ => None,
        })
        .collect();
    if ring.len() < 3 { None } else { Some(ring) }
}

/// Outer rings of every state's polygons.
#[derive(Clone, Debug, Default)]
pub struct StateBoundaries {
    states: HashMap<String, Vec<Ring>>,
}

impl StateBoundaries {
    pub fn from_geojson_str(content: &str) -> Result<Self> {
        let collection: FeatureCollection =
            serde_json::from_str(content).map_err(|e| DashboardError::GeoJson(e.to_string()))?;

        let mut states: HashMap<String, Vec<Ring>> = HashMap::new();
        for feature in collection.features {
            let Some(name) = feature
                .properties
                .get(STATE_NAME_KEY)
                .and_then(|v| v.as_str())
                .map(str::to_string)
            else {
                continue;
            };

            let Some(geometry) = feature.geometry else {
                continue;
            };
            let rings: Vec<Ring> = match geometry.kind.as_str() {
                "Polygon" => {
                    let rings: PolygonCoords = serde_json::from_value(geometry.coordinates)
                        .map_err(|e| DashboardError::GeoJson(format!("{}: {}", name, e)))?;
                    outer_ring(rings).into_iter().collect()
                }
                "MultiPolygon" => {
                    let polygons: Vec<PolygonCoords> =
                        serde_json::from_value(geometry.coordinates)
                            .map_err(|e| DashboardError::GeoJson(format!("{}: {}", name, e)))?;
                    polygons.into_iter().filter_map(outer_ring).collect()
                }
                _ => continue,
            };
            states.entry(name).or_default().extend(rings);
        }

        Ok(StateBoundaries { states })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let boundaries = Self::from_geojson_str(&content)?;
        log::info!(
            "loaded boundaries for {} states from {}",
            boundaries.len(),
            path.display()
        );
        Ok(boundaries)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn polygons(&self, state: &str) -> Option<&[Ring]> {
        self.states.get(state).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Ring])> {
        self.states.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Box around the named states, or around every state when none of them
    /// has a boundary. `None` only when there are no boundaries at all.
    pub fn bounds<'a>(&self, states: impl IntoIterator<Item = &'a str>) -> Option<Bounds> {
        let selected = Bounds::around(
            states
                .into_iter()
                .filter_map(|s| self.states.get(s))
                .flatten()
                .flatten()
                .copied(),
        );
        selected.or_else(|| Bounds::around(self.states.values().flatten().flatten().copied()))
    }
}

/// Mean of a ring's vertices; good enough to place a label inside a state.
pub fn ring_centre(ring: &[(f64, f64)]) -> Option<(f64, f64)> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (lon, lat) = ring
        .iter()
        .fold((0.0_f64, 0.0_f64), |(a, b), &(lon, lat)| (a + lon, b + lat));
    Some((lon / n, lat / n))
}
