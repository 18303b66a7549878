use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use crate::country::CountryId;

/// GeoJSON-shaped feature collection of countries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: String,
}

/// Positions are kept as `Vec<f64>` so that 3D coordinates still parse; only
/// longitude and latitude are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

impl Geometry {
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Geometry::Polygon { coordinates } => {
                MultiPolygon::new(polygon_from_rings(coordinates).into_iter().collect())
            }
            Geometry::MultiPolygon { coordinates } => MultiPolygon::new(
                coordinates
                    .iter()
                    .filter_map(|rings| polygon_from_rings(rings))
                    .collect(),
            ),
        }
    }
}

fn ring_from_positions(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter_map(|p| match p.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Vec<_>>()
        .into()
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = ring_from_positions(exterior);
    if exterior.0.len() < 3 {
        return None;
    }
    let interiors = interiors
        .iter()
        .map(|ring| ring_from_positions(ring))
        .filter(|ring| ring.0.len() >= 3)
        .collect();
    Some(Polygon::new(exterior, interiors))
}

/// A drawable country: immutable for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub shape: MultiPolygon<f64>,
}

impl Topology {
    /// Countries that can actually be drawn. Features without an id or with no
    /// usable polygon are dropped here rather than failing later.
    pub fn countries(&self) -> Vec<Country> {
        let mut out = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            let Some(id) = feature.id.as_deref().filter(|id| !id.is_empty()) else {
                log::debug!("skipping feature without id: {:?}", feature.properties.name);
                continue;
            };
            let Some(geometry) = feature.geometry.as_ref() else {
                log::debug!("skipping feature {id}: no geometry");
                continue;
            };
            let shape = geometry.to_multi_polygon();
            if shape.0.is_empty() {
                log::debug!("skipping feature {id}: empty geometry");
                continue;
            }
            let name = if feature.properties.name.is_empty() {
                id.to_string()
            } else {
                feature.properties.name.clone()
            };
            out.push(Country {
                id: CountryId::new(id),
                name,
                shape,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "USA", "properties": {"name": "United States"},
             "geometry": {"type": "Polygon", "coordinates": [[[-100, 40], [-90, 40], [-90, 30], [-100, 40]]]}},
            {"type": "Feature", "id": "IDN", "properties": {"name": "Indonesia"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[100, 0, 12], [110, 0, 12], [110, -5, 12], [100, 0, 12]]],
                [[[120, 0], [125, 0], [125, -5], [120, 0]]]
             ]}},
            {"type": "Feature", "properties": {"name": "Nowhere"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature", "id": "ATA", "properties": {"name": "Antarctica"}, "geometry": null},
            {"type": "Feature", "id": "XXX", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}
        ]
    }"#;

    #[test]
    fn parses_feature_collection_and_keeps_drawable_countries() {
        let topology: Topology = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(topology.features.len(), 5);

        let countries = topology.countries();
        let ids: Vec<&str> = countries.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["USA", "IDN", "XXX"]);
    }

    #[test]
    fn multipolygon_keeps_every_part_and_drops_altitude() {
        let topology: Topology = serde_json::from_str(SAMPLE).unwrap();
        let countries = topology.countries();
        let idn = &countries[1];
        assert_eq!(idn.shape.0.len(), 2);
        assert_eq!(idn.shape.0[0].exterior().0[1], Coord { x: 110.0, y: 0.0 });
    }

    #[test]
    fn missing_name_falls_back_to_id() {
        let topology: Topology = serde_json::from_str(SAMPLE).unwrap();
        let countries = topology.countries();
        assert_eq!(countries[2].name, "XXX");
    }

    #[test]
    fn degenerate_rings_are_dropped() {
        let geometry = Geometry::Polygon {
            coordinates: vec![vec![vec![0.0, 0.0], vec![1.0]]],
        };
        assert!(geometry.to_multi_polygon().0.is_empty());
    }
}
