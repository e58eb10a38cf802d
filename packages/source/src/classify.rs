//! Entity classification.
//!
//! Every retained record is assigned exactly one entity type by a fixed
//! rule order: administrative markers first, then emergency amenities, then
//! power infrastructure. Records matching no rule are rejected and never
//! reach the output collection.

use gridmap_entity_models::EntityType;
use gridmap_source_models::SourceRecord;

use crate::fields;

/// Property keys that may hold a display name, tried in order.
const NAME_KEYS: &[&str] = &["name:en", "name", "NAME", "ADMIN"];

/// `amenity` tag values that classify as emergency facilities.
const EMERGENCY_AMENITIES: &[&str] = &["hospital", "police", "fire_station"];

/// `power` tag values that classify as power infrastructure.
const POWER_KINDS: &[&str] = &["plant", "substation"];

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The record maps to an entity type; `subtype` carries the matched
    /// tag value (e.g., `"hospital"`, `"plant"`) when one exists.
    Classified {
        /// Assigned entity type.
        entity_type: EntityType,
        /// Matched tag value, used to label unnamed facilities.
        subtype: Option<String>,
    },
    /// No rule matched; the record is dropped.
    Rejected,
}

/// Classifies a record against the fixed rule order.
///
/// Administrative evidence (an `admin_level` tag, a parser-resolved ISO
/// code, or `boundary=administrative`) beats facility tags, so an oddly
/// tagged record carrying both markers still classifies as a region.
#[must_use]
pub fn classify(record: &SourceRecord) -> Classification {
    if record.props.contains_key("admin_level")
        || record.iso_code.is_some()
        || fields::first_match(&record.props, &["boundary"]) == Some("administrative")
    {
        return Classification::Classified {
            entity_type: EntityType::Region,
            subtype: None,
        };
    }

    if let Some(amenity) = fields::first_match(&record.props, &["amenity"])
        && EMERGENCY_AMENITIES.contains(&amenity)
    {
        return Classification::Classified {
            entity_type: EntityType::Emergency,
            subtype: Some(amenity.to_string()),
        };
    }

    if let Some(kind) = fields::first_match(&record.props, &["power"])
        && POWER_KINDS.contains(&kind)
    {
        return Classification::Classified {
            entity_type: EntityType::Power,
            subtype: Some(kind.to_string()),
        };
    }

    Classification::Rejected
}

/// Resolves a display name for a classified record.
///
/// Falls back to `"{label} ({subtype})"` when the record is unnamed but a
/// subtype was matched, and to `"Unnamed {label}"` otherwise.
#[must_use]
pub fn resolve_name(
    record: &SourceRecord,
    entity_type: EntityType,
    subtype: Option<&str>,
) -> String {
    fields::first_match(&record.props, NAME_KEYS).map_or_else(
        || {
            subtype.map_or_else(
                || format!("Unnamed {}", entity_type.label()),
                |subtype| format!("{} ({subtype})", entity_type.label()),
            )
        },
        ToString::to_string,
    )
}

#[cfg(test)]
mod tests {
    use geojson::JsonObject;
    use gridmap_source_models::FeatureGeometry;
    use serde_json::json;

    use super::*;

    fn record(pairs: &[(&str, &str)], iso_code: Option<&str>) -> SourceRecord {
        let props: JsonObject = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), json!(v)))
            .collect();
        SourceRecord {
            raw_id: None,
            iso_code: iso_code.map(ToString::to_string),
            props,
            geometry: FeatureGeometry::Point {
                lng: 55.0,
                lat: 25.0,
            },
        }
    }

    #[test]
    fn admin_level_classifies_as_region() {
        let record = record(&[("admin_level", "6"), ("name", "Dubai")], None);
        assert_eq!(
            classify(&record),
            Classification::Classified {
                entity_type: EntityType::Region,
                subtype: None,
            }
        );
    }

    #[test]
    fn resolved_iso_code_classifies_as_region() {
        let record = record(&[("ADMIN", "United Arab Emirates")], Some("ARE"));
        assert!(matches!(
            classify(&record),
            Classification::Classified {
                entity_type: EntityType::Region,
                ..
            }
        ));
    }

    #[test]
    fn emergency_amenities_classify_with_subtype() {
        for amenity in ["hospital", "police", "fire_station"] {
            let record = record(&[("amenity", amenity)], None);
            assert_eq!(
                classify(&record),
                Classification::Classified {
                    entity_type: EntityType::Emergency,
                    subtype: Some(amenity.to_string()),
                },
                "amenity={amenity}"
            );
        }
    }

    #[test]
    fn power_plant_and_substation_classify_as_power() {
        for kind in ["plant", "substation"] {
            let record = record(&[("power", kind)], None);
            assert_eq!(
                classify(&record),
                Classification::Classified {
                    entity_type: EntityType::Power,
                    subtype: Some(kind.to_string()),
                },
                "power={kind}"
            );
        }
    }

    #[test]
    fn admin_marker_beats_coexisting_facility_tags() {
        let record = record(&[("admin_level", "6"), ("amenity", "hospital")], None);
        assert!(matches!(
            classify(&record),
            Classification::Classified {
                entity_type: EntityType::Region,
                ..
            }
        ));
    }

    #[test]
    fn amenity_beats_coexisting_power_tag() {
        let record = record(&[("amenity", "police"), ("power", "plant")], None);
        assert!(matches!(
            classify(&record),
            Classification::Classified {
                entity_type: EntityType::Emergency,
                ..
            }
        ));
    }

    #[test]
    fn unmatched_records_are_rejected() {
        assert_eq!(
            classify(&record(&[("shop", "bakery")], None)),
            Classification::Rejected
        );
        assert_eq!(
            classify(&record(&[("amenity", "cafe")], None)),
            Classification::Rejected
        );
        assert_eq!(
            classify(&record(&[("power", "line")], None)),
            Classification::Rejected
        );
    }

    #[test]
    fn name_prefers_english_then_local() {
        let english = record(&[("name:en", "Dubai"), ("name", "دبي")], None);
        assert_eq!(resolve_name(&english, EntityType::Region, None), "Dubai");

        let local_only = record(&[("name", "دبي")], None);
        assert_eq!(resolve_name(&local_only, EntityType::Region, None), "دبي");
    }

    #[test]
    fn unnamed_records_get_placeholder_names() {
        let record = record(&[], None);
        assert_eq!(
            resolve_name(&record, EntityType::Emergency, Some("hospital")),
            "Emergency (hospital)"
        );
        assert_eq!(
            resolve_name(&record, EntityType::Region, None),
            "Unnamed Region"
        );
    }
}
