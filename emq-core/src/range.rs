//! Service range table
//!
//! The queue service accepts numeric attributes only inside closed intervals.
//! The bounds are part of the service contract; the client carries them as a
//! single immutable table so the validator can be handed a different contract
//! (for example a private deployment with larger batch sizes).

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: i64,
    pub max: i64,
}

impl FieldRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for FieldRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

const RANGE_COUNT: usize = 9;

/// Bounded numeric attributes known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeKey {
    // Queue level
    DelaySeconds,
    InvisibilitySeconds,
    ReceiveMessageWaitSeconds,
    ReceiveMessageMaximumNumber,
    MessageRetentionSeconds,
    MessageMaximumBytes,
    PartitionNumber,

    // Message level
    MessageDelaySeconds,
    MessageInvisibilitySeconds,
}

impl RangeKey {
    pub const ALL: [RangeKey; RANGE_COUNT] = [
        Self::DelaySeconds,
        Self::InvisibilitySeconds,
        Self::ReceiveMessageWaitSeconds,
        Self::ReceiveMessageMaximumNumber,
        Self::MessageRetentionSeconds,
        Self::MessageMaximumBytes,
        Self::PartitionNumber,
        Self::MessageDelaySeconds,
        Self::MessageInvisibilitySeconds,
    ];

    /// Field name as it appears on the wire and in error messages
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::DelaySeconds => "delaySeconds",
            Self::InvisibilitySeconds => "invisibilitySeconds",
            Self::ReceiveMessageWaitSeconds => "receiveMessageWaitSeconds",
            Self::ReceiveMessageMaximumNumber => "receiveMessageMaximumNumber",
            Self::MessageRetentionSeconds => "messageRetentionSeconds",
            Self::MessageMaximumBytes => "messageMaximumBytes",
            Self::PartitionNumber => "partitionNumber",
            Self::MessageDelaySeconds => "messageDelaySeconds",
            Self::MessageInvisibilitySeconds => "messageInvisibilitySeconds",
        }
    }

    /// Key used in configuration files and environment variables
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::DelaySeconds => "delay_seconds",
            Self::InvisibilitySeconds => "invisibility_seconds",
            Self::ReceiveMessageWaitSeconds => "receive_message_wait_seconds",
            Self::ReceiveMessageMaximumNumber => "receive_message_maximum_number",
            Self::MessageRetentionSeconds => "message_retention_seconds",
            Self::MessageMaximumBytes => "message_maximum_bytes",
            Self::PartitionNumber => "partition_number",
            Self::MessageDelaySeconds => "message_delay_seconds",
            Self::MessageInvisibilitySeconds => "message_invisibility_seconds",
        }
    }

    /// Bounds published by the service
    pub fn default_range(&self) -> FieldRange {
        match self {
            Self::DelaySeconds | Self::MessageDelaySeconds => FieldRange::new(0, 900),
            Self::InvisibilitySeconds | Self::MessageInvisibilitySeconds => {
                FieldRange::new(2, 43_200)
            }
            Self::ReceiveMessageWaitSeconds => FieldRange::new(0, 20),
            Self::ReceiveMessageMaximumNumber => FieldRange::new(1, 10),
            Self::MessageRetentionSeconds => FieldRange::new(1_800, 1_209_600), // 30 min .. 14 days
            Self::MessageMaximumBytes => FieldRange::new(1_024, 262_144),       // 1KB .. 256KB
            Self::PartitionNumber => FieldRange::new(1, 255),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for RangeKey {
    type Err = String;

    /// Accepts the configuration name or the wire name, in any case
    ///
    /// The `config` crate lowercases keys before they get here.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| {
                key.config_name().eq_ignore_ascii_case(s)
                    || key.field_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("unknown range attribute: {s}"))
    }
}

/// Partial range as it may appear in configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeOverride {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Immutable table of bounds, keyed by attribute
///
/// Deserializes from a map of `snake_case` attribute names to `{min, max}`;
/// attributes or bounds left out keep the service defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, RangeOverride>")]
pub struct RangeTable {
    ranges: [FieldRange; RANGE_COUNT],
}

impl Default for RangeTable {
    fn default() -> Self {
        Self {
            ranges: RangeKey::ALL.map(|key| key.default_range()),
        }
    }
}

impl RangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: RangeKey) -> FieldRange {
        self.ranges[key.index()]
    }

    /// Return a copy of the table with one entry replaced
    #[must_use]
    pub fn with(mut self, key: RangeKey, range: FieldRange) -> Self {
        self.ranges[key.index()] = range;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (RangeKey, FieldRange)> + '_ {
        RangeKey::ALL
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }

    /// Reject tables whose intervals are empty
    pub fn check_consistency(&self) -> Result<()> {
        for (key, range) in self.iter() {
            if range.min > range.max {
                return Err(ValidationError::new(format!(
                    "Bad range for {key}: min {} is greater than max {}",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, RangeOverride>> for RangeTable {
    type Error = String;

    fn try_from(
        overrides: BTreeMap<String, RangeOverride>,
    ) -> std::result::Result<Self, Self::Error> {
        let mut table = Self::default();
        for (name, over) in overrides {
            let key: RangeKey = name.parse()?;
            let current = table.get(key);
            table = table.with(
                key,
                FieldRange::new(
                    over.min.unwrap_or(current.min),
                    over.max.unwrap_or(current.max),
                ),
            );
        }
        Ok(table)
    }
}

impl Serialize for RangeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ranges.len()))?;
        for (key, range) in self.iter() {
            map.serialize_entry(key.config_name(), &range)?;
        }
        map.end()
    }
}
