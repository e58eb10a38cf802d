//! Ordered-synonym property lookup.
//!
//! Different releases of the same dataset rename fields (the ISO3 code
//! alone has shipped as `ISO3166-1-Alpha-3`, `iso_a3`, `ADM0_A3`, ...), so
//! logical fields are resolved against a prioritized list of candidate key
//! names rather than a single hardcoded key.

use geojson::JsonObject;

/// Returns the first present, non-empty string value among `keys`,
/// tried in order.
pub fn first_match<'a, K: AsRef<str>>(props: &'a JsonObject, keys: &[K]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        props
            .get(key.as_ref())
            .and_then(serde_json::Value::as_str)
            .filter(|value| !value.is_empty())
    })
}
