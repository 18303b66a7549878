use std::fmt::Write;

use geo::{Coord, MapCoords, MultiPolygon};

/// Plate carrée projection: longitude and latitude (degrees) map linearly
/// onto screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    /// Pixels per radian.
    pub scale: f64,
    pub translate: (f64, f64),
}

impl Equirectangular {
    /// Sized to the target element the same way for every map: one fifth of
    /// the width per radian, centered horizontally, equator at `height / 0.8`.
    pub fn fit(width: f64, height: f64) -> Self {
        Self {
            scale: width / 5.0,
            translate: (width / 2.0, height / 0.8),
        }
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            self.translate.0 + self.scale * lon.to_radians(),
            self.translate.1 - self.scale * lat.to_radians(),
        )
    }
}

/// Turns lon/lat geometry into SVG path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathGenerator {
    projection: Equirectangular,
}

impl PathGenerator {
    pub fn new(projection: Equirectangular) -> Self {
        Self { projection }
    }

    /// One closed subpath per ring, coordinates rounded to 0.1px.
    pub fn path_data(&self, shape: &MultiPolygon<f64>) -> String {
        let projected = shape.map_coords(|c| {
            let (x, y) = self.projection.project(c.x, c.y);
            Coord { x, y }
        });

        let mut d = String::new();
        for polygon in &projected {
            let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
            for ring in rings {
                let mut coords = ring.coords();
                let Some(first) = coords.next() else {
                    continue;
                };
                let _ = write!(d, "M{:.1},{:.1}", first.x, first.y);
                for c in coords {
                    let _ = write!(d, "L{:.1},{:.1}", c.x, c.y);
                }
                d.push('Z');
            }
        }
        d
    }
}
