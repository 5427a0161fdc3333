use serde_json::Value;
use tracing::debug;

use super::{PolygonSet, Ring};
use crate::ordering::geo::GeoPoint;

/// Collects the outer ring of every `Polygon`/`MultiPolygon` in a GeoJSON document.
///
/// Accepts a `FeatureCollection`, a `Feature`, or a bare geometry, either as a JSON
/// value or as a JSON-encoded string. GeoJSON `[lng, lat]` pairs become `(lat, lng)`.
/// Holes are ignored and rings left with fewer than three usable vertices are dropped.
pub fn extract_polygons_from_geojson(geojson: &Value) -> PolygonSet {
    let mut rings = Vec::new();

    match geojson {
        Value::String(raw) => match serde_json::from_str::<Value>(raw.trim()) {
            Ok(decoded @ Value::Object(_)) => collect_document(&decoded, &mut rings),
            Ok(_) => debug!("delivery zones string does not hold a GeoJSON object"),
            Err(err) => debug!(%err, "delivery zones are not valid JSON"),
        },
        Value::Object(_) => collect_document(geojson, &mut rings),
        _ => {}
    }

    PolygonSet::new(rings)
}

fn collect_document(document: &Value, rings: &mut Vec<Ring>) {
    match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = document.get("features").and_then(Value::as_array);
            for feature in features.into_iter().flatten() {
                if let Some(geometry) = feature.get("geometry") {
                    collect_geometry(geometry, rings);
                }
            }
        }
        Some("Feature") => {
            if let Some(geometry) = document.get("geometry") {
                collect_geometry(geometry, rings);
            }
        }
        _ => collect_geometry(document, rings),
    }
}

fn collect_geometry(geometry: &Value, rings: &mut Vec<Ring>) {
    let coordinates = geometry.get("coordinates");
    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => {
            if let Some(ring) = coordinates.and_then(outer_ring) {
                rings.push(ring);
            }
        }
        Some("MultiPolygon") => {
            let polygons = coordinates.and_then(Value::as_array);
            rings.extend(polygons.into_iter().flatten().filter_map(outer_ring));
        }
        _ => {}
    }
}

fn outer_ring(polygon: &Value) -> Option<Ring> {
    let vertices: Ring = polygon
        .get(0)?
        .as_array()?
        .iter()
        .filter_map(|pair| {
            let lng = pair.get(0)?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            let point = GeoPoint::new(lat, lng);
            point.is_finite().then_some(point)
        })
        .collect();

    (vertices.len() >= 3).then_some(vertices)
}
