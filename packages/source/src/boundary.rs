//! Boundary-dataset (polygon feature collection) parser.
//!
//! Properties are passed through as-is. The ISO3 code is resolved against
//! the source's configured synonym keys — first match wins — because
//! releases of the same dataset rename the field. When the source
//! configures an ISO allowlist, features outside it are dropped here.

use geojson::JsonObject;
use gridmap_source_models::{FeatureGeometry, FieldMapping, SourceRecord};
use serde::Deserialize;

use crate::{SourceError, fields};

/// Minimal raw shape of a GeoJSON feature collection, shared with the
/// subdivision parser.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCollection {
    #[serde(default)]
    pub(crate) features: Vec<RawFeature>,
}

/// One raw feature; geometry stays untyped until the parser decides
/// whether to pass it through or project a point out of it.
#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    pub(crate) properties: JsonObject,
    pub(crate) geometry: Option<geojson::Geometry>,
}

/// Parses a boundary feature collection into source records.
///
/// Features without geometry are dropped; polygon geometry is kept
/// unmodified. The resolved ISO code doubles as the stable raw id
/// (lowercased), mirroring how the frontend has always addressed country
/// features.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if the payload is not a feature
/// collection.
pub fn parse_boundaries<'a>(
    payload: serde_json::Value,
    mapping: &'a FieldMapping,
    filter: &'a [String],
) -> Result<impl Iterator<Item = SourceRecord> + 'a, SourceError> {
    let collection: RawCollection = serde_json::from_value(payload)?;

    Ok(collection.features.into_iter().filter_map(move |feature| {
        let geometry = feature.geometry?;
        let iso_code =
            fields::first_match(&feature.properties, &mapping.iso_code).map(str::to_uppercase);

        if !filter.is_empty() {
            let code = iso_code.as_deref()?;
            if !filter.iter().any(|allowed| allowed == code) {
                return None;
            }
        }

        Some(SourceRecord {
            raw_id: iso_code.as_ref().map(|code| code.to_lowercase()),
            iso_code,
            props: feature.properties,
            geometry: FeatureGeometry::Area(geometry),
        })
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mapping() -> FieldMapping {
        FieldMapping {
            iso_code: ["ISO3166-1-Alpha-3", "iso_a3", "ADM0_A3"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    fn polygon_feature(properties: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": properties,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[54.0, 24.0], [55.0, 24.0], [55.0, 25.0], [54.0, 24.0]]]
            }
        })
    }

    #[test]
    fn iso_code_resolves_across_renamed_keys() {
        let payload = json!({ "type": "FeatureCollection", "features": [
            polygon_feature(json!({ "ADM0_A3": "are", "ADMIN": "United Arab Emirates" })),
        ]});

        let records: Vec<SourceRecord> =
            parse_boundaries(payload, &mapping(), &[]).unwrap().collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].iso_code.as_deref(), Some("ARE"));
        assert_eq!(records[0].raw_id.as_deref(), Some("are"));
        // Properties pass through untouched.
        assert_eq!(records[0].props["ADMIN"], json!("United Arab Emirates"));
    }

    #[test]
    fn earlier_synonym_key_takes_precedence() {
        let payload = json!({ "type": "FeatureCollection", "features": [
            polygon_feature(json!({ "iso_a3": "QAT", "ADM0_A3": "XXX" })),
        ]});

        let records: Vec<SourceRecord> =
            parse_boundaries(payload, &mapping(), &[]).unwrap().collect();

        assert_eq!(records[0].iso_code.as_deref(), Some("QAT"));
    }

    #[test]
    fn filter_keeps_only_allowed_codes() {
        let payload = json!({ "type": "FeatureCollection", "features": [
            polygon_feature(json!({ "iso_a3": "ARE" })),
            polygon_feature(json!({ "iso_a3": "FRA" })),
            polygon_feature(json!({ "name": "no code at all" })),
        ]});
        let filter = vec!["ARE".to_string(), "QAT".to_string()];

        let records: Vec<SourceRecord> = parse_boundaries(payload, &mapping(), &filter)
            .unwrap()
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].iso_code.as_deref(), Some("ARE"));
    }

    #[test]
    fn features_without_geometry_are_dropped() {
        let payload = json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "iso_a3": "ARE" }, "geometry": null },
        ]});

        let records: Vec<SourceRecord> =
            parse_boundaries(payload, &mapping(), &[]).unwrap().collect();

        assert!(records.is_empty());
    }
}
