//! Delivery-zone containment using the even-odd ray casting rule.

mod geojson;

use serde::Serialize;

use super::geo::GeoPoint;

pub use geojson::extract_polygons_from_geojson;

const EDGE_EPSILON: f64 = 1e-12;

/// Closed ring of vertices; the last vertex implicitly connects back to the first.
pub type Ring = Vec<GeoPoint>;

/// Union of delivery zones. A point inside any ring is inside the set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolygonSet {
    rings: Vec<Ring>,
}

impl PolygonSet {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point_in_polygons(point.lat, point.lng, &self.rings)
    }
}

pub fn point_in_polygon(lat: f64, lng: f64, ring: &[GeoPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        let straddles = (a.lng > lng) != (b.lng > lng);
        if straddles {
            let crossing_lat =
                (b.lat - a.lat) * (lng - a.lng) / (b.lng - a.lng + EDGE_EPSILON) + a.lat;
            if lat < crossing_lat {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub fn point_in_polygons(lat: f64, lng: f64, rings: &[Ring]) -> bool {
    rings
        .iter()
        .filter(|ring| ring.len() >= 3)
        .any(|ring| point_in_polygon(lat, lng, ring))
}
