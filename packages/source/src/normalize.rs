//! Record-to-feature normalization.
//!
//! Maps a classified [`SourceRecord`] to a [`NormalizedFeature`] carrying
//! the unified output schema: resolved id and name, best-effort country,
//! and placeholder attributes drawn from the source's configured ranges.
//! The normalizer owns the run-wide id set, so ids are unique across every
//! source contributing to one output collection.

use std::collections::HashSet;

use gridmap_entity_models::{EntityType, ValueRange};
use gridmap_source_models::{NormalizedFeature, SourceDefinition, SourceRecord};

use crate::classify;
use crate::fields;
use crate::sampler::AttributeSampler;

/// Country fallback when neither tags nor parser resolved one.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Property keys that may hold a country name or code, tried in order.
const COUNTRY_KEYS: &[&str] = &["ISO3166-1", "addr:country", "country"];

/// Range synthesized ids are drawn from when a source record has no
/// native identifier.
const SYNTH_ID_RANGE: ValueRange = ValueRange::new(100_000, 999_999);

/// Stateful normalizer for one pipeline run.
pub struct Normalizer<S> {
    sampler: S,
    used_ids: HashSet<String>,
}

impl<S: AttributeSampler> Normalizer<S> {
    /// Creates a normalizer with an empty id set.
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            used_ids: HashSet::new(),
        }
    }

    /// Normalizes one classified record.
    ///
    /// Returns `None` (with a warning) when the source configured no
    /// attribute profile for `entity_type`; a config gap must not abort the
    /// rest of the source.
    pub fn normalize(
        &mut self,
        def: &SourceDefinition,
        record: SourceRecord,
        entity_type: EntityType,
        subtype: Option<&str>,
    ) -> Option<NormalizedFeature> {
        let Some(profile) = def.attributes.profile(entity_type) else {
            log::warn!(
                "{}: no attribute profile for type `{entity_type}`, dropping record",
                def.id
            );
            return None;
        };
        let profile = *profile;

        let name = classify::resolve_name(&record, entity_type, subtype);
        let country = fields::first_match(&record.props, COUNTRY_KEYS)
            .map(ToString::to_string)
            .or_else(|| record.iso_code.clone())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

        let id = self.resolve_id(def, record.raw_id.as_deref());

        // Only regions carry a sampled urgency; facilities are always the
        // highest priority.
        let priority = match entity_type {
            EntityType::Region => {
                u8::try_from(self.sampler.sample(profile.priority)).unwrap_or(u8::MAX)
            }
            EntityType::Emergency | EntityType::Power => 1,
        };

        Some(NormalizedFeature {
            id,
            name,
            entity_type,
            country,
            production: self.sampler.sample(profile.production),
            demand: self.sampler.sample(profile.demand),
            storage: self.sampler.sample(profile.storage),
            priority,
            geometry: record.geometry,
        })
    }

    /// Builds a prefixed id from the record's native identifier, or
    /// synthesizes one when the source provides none. Either way the result
    /// is unique for this run.
    fn resolve_id(&mut self, def: &SourceDefinition, raw_id: Option<&str>) -> String {
        if let Some(raw) = raw_id {
            let candidate = format!("{}-{raw}", def.id_prefix);
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
            log::warn!("{}: duplicate id `{candidate}`, synthesizing", def.id);
        }

        loop {
            let candidate = format!("{}-{}", def.id_prefix, self.sampler.sample(SYNTH_ID_RANGE));
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
