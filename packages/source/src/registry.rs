//! Embedded source registry.
//!
//! Source definitions live in TOML files under `sources/` and are embedded
//! at compile time, so a deployed binary carries its full source catalog.
//! Area sources are listed ahead of point sources; the merger preserves
//! this order so boundary polygons render underneath markers.

use gridmap_source_models::SourceDefinition;

use crate::SourceError;

/// Embedded source configs, in merge order.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    (
        "geo_countries",
        include_str!("../sources/geo_countries.toml"),
    ),
    (
        "ne_admin1_points",
        include_str!("../sources/ne_admin1_points.toml"),
    ),
    ("overpass_uae", include_str!("../sources/overpass_uae.toml")),
];

/// Parses one source definition from raw TOML.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_source_toml(raw: &str) -> Result<SourceDefinition, SourceError> {
    toml::from_str(raw).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}

/// All embedded source definitions, in merge order.
///
/// # Panics
///
/// Panics if an embedded config fails to parse. The configs are compiled
/// into the binary, so a malformed one is a build defect, not a runtime
/// condition.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, raw)| match parse_source_toml(raw) {
            Ok(def) => def,
            Err(e) => panic!("embedded source config `{name}` is malformed: {e}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use gridmap_entity_models::EntityType;
    use gridmap_source_models::SourceKind;

    use super::*;

    #[test]
    fn all_embedded_configs_parse() {
        let sources = all_sources();
        assert_eq!(sources.len(), 3);
    }

    #[test]
    fn source_ids_are_unique_and_match_file_names() {
        let sources = all_sources();
        let ids: HashSet<&str> = sources.iter().map(|def| def.id.as_str()).collect();
        assert_eq!(ids.len(), sources.len());
        for (name, _) in SOURCE_TOMLS {
            assert!(ids.contains(name), "no source with id `{name}`");
        }
    }

    #[test]
    fn area_sources_precede_point_sources() {
        let sources = all_sources();
        let first_point = sources
            .iter()
            .position(|def| !def.kind.is_area())
            .unwrap_or(sources.len());
        assert!(
            sources[first_point..].iter().all(|def| !def.kind.is_area()),
            "area source listed after a point source"
        );
    }

    #[test]
    fn tag_query_source_is_mandatory_and_has_a_query() {
        let sources = all_sources();
        let overpass = sources
            .iter()
            .find(|def| def.kind == SourceKind::TagQuery)
            .unwrap();
        assert!(overpass.mandatory);
        assert!(overpass.query.is_some());
        assert!(overpass.endpoints.len() >= 2);
    }

    #[test]
    fn every_source_covers_the_types_it_can_produce() {
        for def in all_sources() {
            let required: &[EntityType] = match def.kind {
                SourceKind::TagQuery => EntityType::ALL,
                SourceKind::Boundary | SourceKind::Subdivision => &[EntityType::Region],
            };
            for entity_type in required {
                assert!(
                    def.attributes.profile(*entity_type).is_some(),
                    "source `{}` has no profile for `{entity_type}`",
                    def.id
                );
            }
        }
    }

    #[test]
    fn static_sources_filter_to_the_target_region() {
        for def in all_sources() {
            if def.kind == SourceKind::TagQuery {
                assert!(def.filter.is_empty());
            } else {
                assert!(def.filter.contains(&"ARE".to_string()));
            }
        }
    }
}
