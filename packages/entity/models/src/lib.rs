#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entity taxonomy and placeholder attribute policy types.
//!
//! This crate defines the closed set of entity types every retained record
//! maps to, plus the configuration types describing the inclusive integer
//! ranges the placeholder `production`/`demand`/`storage` values are drawn
//! from. Ranges live in per-source TOML configs, never in code.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The closed classification assigned to every retained record.
///
/// Serialized lowercase because the frontend matches on the literal strings
/// `"region"`, `"emergency"`, and `"power"` in feature properties.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityType {
    /// Administrative area (country, emirate, district).
    Region,
    /// Hospital, police, or fire service facility.
    Emergency,
    /// Power generation plant or substation.
    Power,
}

impl EntityType {
    /// All entity types, in classification priority order.
    pub const ALL: &[Self] = &[Self::Region, Self::Emergency, Self::Power];

    /// Capitalized label used in placeholder names (`"Unnamed Region"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Emergency => "Emergency",
            Self::Power => "Power",
        }
    }
}

/// An inclusive integer range a placeholder attribute is sampled from.
///
/// Written as a two-element array in TOML: `production = [100, 1000]`.
/// A degenerate range (`[0, 0]`) pins the attribute to a constant, which is
/// how the zero-production/zero-demand patterns are expressed in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct ValueRange {
    /// Inclusive lower bound.
    pub min: u64,
    /// Inclusive upper bound.
    pub max: u64,
}

impl ValueRange {
    /// Creates a range, swapping the bounds if they are reversed.
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// The `[1, 1]` range used as the fixed highest-urgency priority.
    #[must_use]
    pub const fn fixed_one() -> Self {
        Self { min: 1, max: 1 }
    }

    /// Returns `true` if `value` lies within the inclusive bounds.
    #[must_use]
    pub const fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl From<[u64; 2]> for ValueRange {
    fn from([min, max]: [u64; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<ValueRange> for [u64; 2] {
    fn from(range: ValueRange) -> Self {
        [range.min, range.max]
    }
}

/// Placeholder attribute ranges for one entity type from one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeProfile {
    /// Range for the `prod` output property.
    pub production: ValueRange,
    /// Range for the `dem` output property.
    pub demand: ValueRange,
    /// Range for the `store` output property.
    pub storage: ValueRange,
    /// Range for the `priority` output property. Only sampled for regions;
    /// emergency and power facilities are always priority 1.
    #[serde(default = "ValueRange::fixed_one")]
    pub priority: ValueRange,
}

/// Per-entity-type attribute profiles for one source.
///
/// A source only needs profiles for the types its records can classify as
/// (the boundary dataset, for example, only ever yields regions).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeTable {
    /// Profile applied to `region` records.
    pub region: Option<AttributeProfile>,
    /// Profile applied to `emergency` records.
    pub emergency: Option<AttributeProfile>,
    /// Profile applied to `power` records.
    pub power: Option<AttributeProfile>,
}

impl AttributeTable {
    /// Returns the profile for `entity_type`, if the source configured one.
    #[must_use]
    pub const fn profile(&self, entity_type: EntityType) -> Option<&AttributeProfile> {
        match entity_type {
            EntityType::Region => self.region.as_ref(),
            EntityType::Emergency => self.emergency.as_ref(),
            EntityType::Power => self.power.as_ref(),
        }
    }
}
