//! Admin-subdivision (point feature collection) parser.
//!
//! Unlike boundary datasets, the subdivision dataset has a stable published
//! schema, so its fields are deserialized directly rather than resolved
//! through synonym lists. Records are rebuilt with a canonical property set
//! (`name`, `country`) instead of passing the very wide upstream property
//! bag through.

use geojson::JsonObject;
use gridmap_source_models::{FeatureGeometry, SourceRecord};
use serde::Deserialize;
use serde_json::json;

use crate::SourceError;
use crate::boundary::RawCollection;

/// The subset of the upstream per-feature schema we consume.
#[derive(Debug, Deserialize)]
struct SubdivisionProps {
    ne_id: Option<i64>,
    name: Option<String>,
    /// Admin-0 (country) name the subdivision belongs to.
    admin: Option<String>,
    adm0_a3: Option<String>,
}

/// Parses a subdivision feature collection into source records.
///
/// Only point features are kept; the dataset occasionally ships stray
/// non-point geometry which is dropped. The ISO filter applies to the
/// parent country's `adm0_a3` code.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if the payload is not a feature
/// collection.
pub fn parse_subdivisions(
    payload: serde_json::Value,
    filter: &[String],
) -> Result<impl Iterator<Item = SourceRecord> + '_, SourceError> {
    let collection: RawCollection = serde_json::from_value(payload)?;

    Ok(collection.features.into_iter().filter_map(move |feature| {
        let geometry = feature.geometry?;
        let geojson::Value::Point(coords) = geometry.value else {
            return None;
        };
        let (lng, lat) = (*coords.first()?, *coords.get(1)?);

        let props: SubdivisionProps =
            serde_json::from_value(serde_json::Value::Object(feature.properties)).ok()?;
        let iso_code = props.adm0_a3.map(|code| code.to_uppercase());

        if !filter.is_empty() {
            let code = iso_code.as_deref()?;
            if !filter.iter().any(|allowed| allowed == code) {
                return None;
            }
        }

        let mut canonical = JsonObject::new();
        if let Some(name) = props.name {
            canonical.insert("name".to_string(), json!(name));
        }
        if let Some(admin) = props.admin {
            canonical.insert("country".to_string(), json!(admin));
        }

        Some(SourceRecord {
            raw_id: props.ne_id.map(|id| id.to_string()),
            iso_code,
            props: canonical,
            geometry: FeatureGeometry::Point { lng, lat },
        })
    }))
}
