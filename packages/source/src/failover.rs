//! Endpoint failover fetcher.
//!
//! Walks a source's candidate endpoints strictly in order and returns the
//! first payload that is non-empty and decodes into records. A failing
//! endpoint is abandoned and the next one tried — there is no backoff, and
//! endpoints after the first success are never contacted. An optional
//! per-source `retries` count re-attempts the same endpoint before failing
//! over, for sources whose mirrors are known to be flaky.

use std::time::Duration;

use gridmap_source_models::SourceDefinition;

use crate::SourceError;
use crate::transport::Transport;

/// Fetches `def`'s records from the first endpoint that succeeds.
///
/// An attempt succeeds when the transport call completes within the
/// configured timeout, the status is a success, the body decodes as JSON,
/// the payload holds at least one record under the source kind's records
/// key (`elements` or `features`), and `parse` accepts the payload. A
/// shape-corrupt payload from one mirror is recoverable like any other
/// failure: it is logged and the walk continues.
///
/// # Errors
///
/// Returns [`SourceError::AllEndpointsFailed`] once every endpoint (and
/// every configured retry) has been exhausted.
pub async fn fetch_first_success<T, F>(
    transport: &dyn Transport,
    def: &SourceDefinition,
    parse: F,
) -> Result<T, SourceError>
where
    F: Fn(serde_json::Value) -> Result<T, SourceError>,
{
    let timeout = Duration::from_secs(def.timeout_secs);
    let form: Option<Vec<(String, String)>> = def
        .query
        .as_ref()
        .map(|query| vec![("data".to_string(), query.clone())]);

    for url in &def.endpoints {
        for attempt in 0..=def.retries {
            if attempt > 0 {
                log::warn!("{}: retry {attempt}/{} for {url}", def.id, def.retries);
            }

            match transport.fetch_json(url, form.as_deref(), timeout).await {
                Ok(payload) => {
                    let count = record_count(&payload, def.kind.records_key());
                    if count == 0 {
                        log::warn!("{}: endpoint {url} returned an empty result set", def.id);
                        continue;
                    }
                    match parse(payload) {
                        Ok(parsed) => {
                            log::info!("{}: fetched {count} record(s) from {url}", def.id);
                            return Ok(parsed);
                        }
                        Err(e) => {
                            log::warn!("{}: payload from {url} failed to decode: {e}", def.id);
                        }
                    }
                }
                Err(e) => {
                    log::warn!("{}: endpoint {url} failed: {e}", def.id);
                }
            }
        }
    }

    Err(SourceError::AllEndpointsFailed {
        source_id: def.id.clone(),
        attempted: def.endpoints.len(),
    })
}

/// Number of entries under the payload's records key, or 0 when the key is
/// missing or not an array.
fn record_count(payload: &serde_json::Value, records_key: &str) -> usize {
    payload
        .get(records_key)
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len)
}
