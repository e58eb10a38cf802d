#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pipeline orchestration: fetch every configured source, classify and
//! normalize its records, and merge everything into one GeoJSON feature
//! collection.
//!
//! Sources are processed in registry order (area sources first), and record
//! order within a source is preserved, so output ordering is stable for a
//! given set of payloads. A mandatory source that fails aborts the run;
//! optional sources just contribute zero features.

use std::collections::BTreeMap;
use std::path::Path;

use geojson::FeatureCollection;
use gridmap_entity_models::EntityType;
use gridmap_source::classify::{self, Classification};
use gridmap_source::normalize::Normalizer;
use gridmap_source::sampler::RngSampler;
use gridmap_source::transport::{HttpTransport, Transport};
use gridmap_source::{SourceError, boundary, failover, overpass, registry, subdivision};
use gridmap_source_models::{SourceDefinition, SourceKind, SourceRecord};

/// Errors that can occur while running the pipeline or writing its output.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A source failed in a way that aborts the run.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing the output file failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the output collection failed.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Run-level options.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Seed for the attribute sampler. `None` seeds from the operating
    /// system; a fixed seed reproduces a run's placeholder values exactly.
    pub seed: Option<u64>,
}

/// Per-source outcome counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSummary {
    /// Source id.
    pub id: String,
    /// Whether any endpoint produced a usable payload.
    pub fetched: bool,
    /// Records that made it into the output collection, by assigned type.
    pub kept_by_type: BTreeMap<EntityType, usize>,
    /// Records dropped by classification or normalization.
    pub rejected: usize,
}

impl SourceSummary {
    /// Records this source contributed across every type.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.kept_by_type.values().sum()
    }
}

/// Outcome counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// One entry per configured source, in processing order.
    pub sources: Vec<SourceSummary>,
}

impl RunSummary {
    /// Total number of features in the output collection.
    #[must_use]
    pub fn total_features(&self) -> usize {
        self.sources.iter().map(SourceSummary::kept).sum()
    }

    /// Logs one line per source (with a per-type breakdown) plus a total.
    pub fn log(&self) {
        for source in &self.sources {
            if source.fetched {
                let breakdown = source
                    .kept_by_type
                    .iter()
                    .map(|(entity_type, count)| format!("{entity_type}={count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                log::info!(
                    "{}: kept {} feature(s) ({breakdown}), rejected {}",
                    source.id,
                    source.kept(),
                    source.rejected
                );
            } else {
                log::warn!("{}: no usable payload, contributed 0 features", source.id);
            }
        }
        log::info!("total: {} feature(s)", self.total_features());
    }
}

/// The merged collection plus its run summary.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Merged feature collection, area features first.
    pub collection: FeatureCollection,
    /// Per-source outcome counters.
    pub summary: RunSummary,
}

/// Runs the full pipeline against the embedded source registry over HTTP.
///
/// # Errors
///
/// Returns [`GenerateError`] if the HTTP client cannot be built or a
/// mandatory source fails.
pub async fn run(options: PipelineOptions) -> Result<PipelineOutput, GenerateError> {
    let transport = HttpTransport::new()?;
    run_with(&transport, &registry::all_sources(), options).await
}

/// Runs the pipeline against explicit sources and a caller-chosen transport.
///
/// # Errors
///
/// Returns [`GenerateError::Source`] when a mandatory source exhausts its
/// endpoints or yields an undecodable payload. Optional sources log the
/// failure and contribute nothing.
pub async fn run_with(
    transport: &dyn Transport,
    sources: &[SourceDefinition],
    options: PipelineOptions,
) -> Result<PipelineOutput, GenerateError> {
    let sampler = options
        .seed
        .map_or_else(RngSampler::from_entropy, RngSampler::seeded);
    let mut normalizer = Normalizer::new(sampler);

    let mut features = Vec::new();
    let mut summary = RunSummary::default();

    for def in sources {
        log::info!("{}: processing `{}`", def.id, def.name);

        let records = match collect_records(transport, def).await {
            Ok(records) => records,
            Err(e) if def.mandatory => {
                log::error!("{}: mandatory source failed: {e}", def.id);
                return Err(e.into());
            }
            Err(e) => {
                log::warn!("{}: optional source failed: {e}", def.id);
                summary.sources.push(SourceSummary {
                    id: def.id.clone(),
                    ..SourceSummary::default()
                });
                continue;
            }
        };

        let mut kept_by_type = BTreeMap::new();
        let mut rejected = 0;

        for record in records {
            match classify::classify(&record) {
                Classification::Classified {
                    entity_type,
                    subtype,
                } => {
                    match normalizer.normalize(def, record, entity_type, subtype.as_deref()) {
                        Some(feature) => {
                            features.push(feature.to_feature());
                            *kept_by_type.entry(entity_type).or_insert(0) += 1;
                        }
                        None => rejected += 1,
                    }
                }
                Classification::Rejected => rejected += 1,
            }
        }

        summary.sources.push(SourceSummary {
            id: def.id.clone(),
            fetched: true,
            kept_by_type,
            rejected,
        });
    }

    Ok(PipelineOutput {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        summary,
    })
}

/// Fetches one source with failover, decoding each candidate payload with
/// the parser for its kind. A mirror serving a shape-corrupt payload is a
/// failover trigger, not a source failure.
async fn collect_records(
    transport: &dyn Transport,
    def: &SourceDefinition,
) -> Result<Vec<SourceRecord>, SourceError> {
    match def.kind {
        SourceKind::TagQuery => {
            failover::fetch_first_success(transport, def, |payload| {
                Ok(overpass::parse_elements(payload)?.collect())
            })
            .await
        }
        SourceKind::Boundary => {
            failover::fetch_first_success(transport, def, |payload| {
                Ok(boundary::parse_boundaries(payload, &def.fields, &def.filter)?.collect())
            })
            .await
        }
        SourceKind::Subdivision => {
            failover::fetch_first_success(transport, def, |payload| {
                Ok(subdivision::parse_subdivisions(payload, &def.filter)?.collect())
            })
            .await
        }
    }
}

/// Writes the collection as pretty-printed GeoJSON, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns [`GenerateError`] if serialization or the filesystem write
/// fails.
pub fn write_collection(collection: &FeatureCollection, path: &Path) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let body = serde_json::to_string_pretty(collection)?;
    std::fs::write(path, body)?;
    log::info!(
        "wrote {} feature(s) to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}
