//! Tag-query (Overpass) payload parser.
//!
//! The payload is a flat `elements` array. Nodes carry direct `lat`/`lon`
//! coordinates; relations queried with `out center` carry a nested `center`
//! point instead. Elements with no resolvable coordinates are dropped.

use geojson::JsonObject;
use gridmap_source_models::{FeatureGeometry, SourceRecord};
use serde::Deserialize;

use crate::SourceError;

#[derive(Debug, Deserialize)]
struct TagQueryResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

/// One raw element from the tag-query service.
#[derive(Debug, Deserialize)]
struct Element {
    id: Option<i64>,
    #[serde(default)]
    tags: JsonObject,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<CenterPoint>,
}

#[derive(Debug, Deserialize)]
struct CenterPoint {
    lat: f64,
    lon: f64,
}

/// Parses a tag-query payload into source records.
///
/// The returned sequence is finite and consumed in one pass; re-iterating
/// requires parsing the payload again.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if the payload does not match the
/// tag-query response shape.
pub fn parse_elements(
    payload: serde_json::Value,
) -> Result<impl Iterator<Item = SourceRecord>, SourceError> {
    let response: TagQueryResponse = serde_json::from_value(payload)?;
    Ok(response.elements.into_iter().filter_map(element_to_record))
}

/// Converts one element, or `None` when coordinates cannot be resolved.
fn element_to_record(element: Element) -> Option<SourceRecord> {
    let lat = element.lat.or_else(|| element.center.as_ref().map(|c| c.lat))?;
    let lng = element.lon.or_else(|| element.center.as_ref().map(|c| c.lon))?;

    Some(SourceRecord {
        raw_id: element.id.map(|id| id.to_string()),
        iso_code: None,
        props: element.tags,
        geometry: FeatureGeometry::Point { lng, lat },
    })
}
