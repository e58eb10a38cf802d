#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Source configuration types, the intermediate record format, and the
//! canonical normalized feature.
//!
//! Every data source is described by a [`SourceDefinition`] loaded from an
//! embedded TOML config. Parsers turn raw payloads into [`SourceRecord`]s,
//! and the normalizer maps classified records to [`NormalizedFeature`]s that
//! serialize to the exact property schema the map frontend expects.

use geojson::JsonObject;
use gridmap_entity_models::{AttributeTable, EntityType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum_macros::{AsRefStr, Display, EnumString};

/// The shape of a data source's payload, deciding which parser handles it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    /// Overpass-style tag query returning a flat `elements` array.
    TagQuery,
    /// Static GeoJSON collection of administrative boundary polygons.
    Boundary,
    /// Static GeoJSON collection of subdivision points with a fixed schema.
    Subdivision,
}

impl SourceKind {
    /// JSON key holding the payload's result records. A successful fetch
    /// must contain at least one entry under this key.
    #[must_use]
    pub const fn records_key(self) -> &'static str {
        match self {
            Self::TagQuery => "elements",
            Self::Boundary | Self::Subdivision => "features",
        }
    }

    /// Returns `true` for sources whose records carry area geometry.
    /// Area sources are merged into the output collection ahead of
    /// point sources.
    #[must_use]
    pub const fn is_area(self) -> bool {
        matches!(self, Self::Boundary)
    }
}

/// Field name synonyms for logical fields that datasets rename between
/// releases. Each list is tried in order; the first present, non-empty
/// value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Property keys that may hold the ISO3 country/admin code.
    #[serde(default)]
    pub iso_code: Vec<String>,
}

/// A complete, config-driven data source definition.
///
/// Loaded from TOML files embedded at compile time; see the registry in
/// `gridmap_source`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"geo_countries"`).
    pub id: String,
    /// Human-readable name for log output.
    pub name: String,
    /// Which parser handles this source's payload.
    pub kind: SourceKind,
    /// Whether exhausting every endpoint aborts the whole run. Optional
    /// sources simply contribute zero features on failure.
    #[serde(default)]
    pub mandatory: bool,
    /// Prefix for generated feature ids (e.g., `"osm"` -> `"osm-123456"`).
    pub id_prefix: String,
    /// Per-attempt timeout in seconds for each endpoint call.
    pub timeout_secs: u64,
    /// Extra attempts per endpoint before failing over (default 0).
    #[serde(default)]
    pub retries: u32,
    /// Candidate endpoints, tried strictly in order.
    pub endpoints: Vec<String>,
    /// Query payload POSTed as the `data` form field (tag-query sources
    /// only; static datasets are plain GETs).
    #[serde(default)]
    pub query: Option<String>,
    /// Synonym key lists for fields that vary across dataset releases.
    #[serde(default)]
    pub fields: FieldMapping,
    /// ISO3 allowlist. When non-empty, records whose resolved code is not
    /// in the list are dropped at parse time.
    #[serde(default)]
    pub filter: Vec<String>,
    /// Placeholder attribute ranges per entity type.
    pub attributes: AttributeTable,
}

/// Geometry carried by a record, either a bare coordinate pair or an area
/// geometry passed through unmodified from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// A single (longitude, latitude) position.
    Point {
        /// Longitude (WGS84).
        lng: f64,
        /// Latitude (WGS84).
        lat: f64,
    },
    /// A Polygon or MultiPolygon taken verbatim from the source.
    Area(geojson::Geometry),
}

/// A raw record from one source, after parsing but before classification.
///
/// Ephemeral; exists only while its source is being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// Stable source-native identifier, when the source provides one.
    pub raw_id: Option<String>,
    /// ISO3 code resolved by the parser via the configured synonym keys.
    pub iso_code: Option<String>,
    /// Source-specific tags or properties, taken as-is.
    pub props: JsonObject,
    /// Record geometry.
    pub geometry: FeatureGeometry,
}

/// An entity normalized to the unified output schema.
///
/// All sources produce this type after classification and normalization.
/// [`NormalizedFeature::to_feature`] emits the exact property names the
/// frontend parses (`prod`, `dem`, `store`, `pos`), which must never change.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeature {
    /// Identifier, unique within one output collection.
    pub id: String,
    /// Best-effort human-readable label.
    pub name: String,
    /// Assigned entity type.
    pub entity_type: EntityType,
    /// ISO or admin country name, or `"unknown"`.
    pub country: String,
    /// Placeholder production value (`prod`).
    pub production: u64,
    /// Placeholder demand value (`dem`).
    pub demand: u64,
    /// Placeholder storage value (`store`).
    pub storage: u64,
    /// Urgency priority; 1 is highest.
    pub priority: u8,
    /// Point or area geometry, coordinate order (longitude, latitude).
    pub geometry: FeatureGeometry,
}

impl NormalizedFeature {
    /// Converts to a GeoJSON feature with the frontend's property contract.
    ///
    /// Point features additionally carry `lat`, `lng`, and the legacy `pos`
    /// string (`"[lng,lat]"`) that the frontend's marker parser slices
    /// apart. Area features omit all three; `pos` is only meaningful for
    /// point entities.
    #[must_use]
    pub fn to_feature(&self) -> geojson::Feature {
        let mut props = JsonObject::new();
        props.insert("id".to_string(), json!(self.id));
        props.insert("name".to_string(), json!(self.name));
        props.insert("type".to_string(), json!(self.entity_type.to_string()));
        props.insert("country".to_string(), json!(self.country));
        props.insert("prod".to_string(), json!(self.production));
        props.insert("dem".to_string(), json!(self.demand));
        props.insert("store".to_string(), json!(self.storage));
        props.insert("priority".to_string(), json!(self.priority));

        let geometry = match &self.geometry {
            FeatureGeometry::Point { lng, lat } => {
                // {:?} keeps the trailing ".0" on whole numbers, matching
                // the format the frontend's string parser was built against.
                props.insert("pos".to_string(), json!(format!("[{lng:?},{lat:?}]")));
                props.insert("lat".to_string(), json!(lat));
                props.insert("lng".to_string(), json!(lng));
                geojson::Geometry::new(geojson::Value::Point(vec![*lng, *lat]))
            }
            FeatureGeometry::Area(geometry) => geometry.clone(),
        };

        geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_feature(geometry: FeatureGeometry) -> NormalizedFeature {
        NormalizedFeature {
            id: "osm-42".to_string(),
            name: "Test Hospital".to_string(),
            entity_type: EntityType::Emergency,
            country: "ARE".to_string(),
            production: 0,
            demand: 640,
            storage: 120,
            priority: 1,
            geometry,
        }
    }

    #[test]
    fn point_feature_carries_legacy_pos_string() {
        let feature = sample_feature(FeatureGeometry::Point {
            lng: 55.0,
            lat: 25.0,
        })
        .to_feature();

        let props = feature.properties.unwrap();
        assert_eq!(props["pos"], json!("[55.0,25.0]"));
        assert_eq!(props["lat"], json!(25.0));
        assert_eq!(props["lng"], json!(55.0));
        assert_eq!(props["type"], json!("emergency"));
        assert_eq!(props["prod"], json!(0));
        assert_eq!(props["dem"], json!(640));
        assert_eq!(props["store"], json!(120));

        match feature.geometry.unwrap().value {
            geojson::Value::Point(coords) => assert_eq!(coords, vec![55.0, 25.0]),
            other => panic!("expected Point geometry, got {other:?}"),
        }
    }

    #[test]
    fn pos_string_keeps_fractional_digits() {
        let feature = sample_feature(FeatureGeometry::Point {
            lng: 55.2708,
            lat: 25.2048,
        })
        .to_feature();

        let props = feature.properties.unwrap();
        assert_eq!(props["pos"], json!("[55.2708,25.2048]"));
    }

    #[test]
    fn area_feature_omits_point_only_properties() {
        let ring = vec![vec![
            vec![54.0, 24.0],
            vec![55.0, 24.0],
            vec![55.0, 25.0],
            vec![54.0, 24.0],
        ]];
        let feature = sample_feature(FeatureGeometry::Area(geojson::Geometry::new(
            geojson::Value::Polygon(ring),
        )))
        .to_feature();

        let props = feature.properties.unwrap();
        assert!(!props.contains_key("pos"));
        assert!(!props.contains_key("lat"));
        assert!(!props.contains_key("lng"));
        assert!(matches!(
            feature.geometry.unwrap().value,
            geojson::Value::Polygon(_)
        ));
    }

    #[test]
    fn records_key_matches_payload_shape() {
        assert_eq!(SourceKind::TagQuery.records_key(), "elements");
        assert_eq!(SourceKind::Boundary.records_key(), "features");
        assert_eq!(SourceKind::Subdivision.records_key(), "features");
    }
}
