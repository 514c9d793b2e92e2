//! Aggregation engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for provider fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanOutConfig {
    /// Time budget for a single provider call; an elapsed budget counts as
    /// a provider failure and is absorbed like any other.
    #[serde(with = "duration_secs")]
    pub provider_timeout: Duration,

    /// Whether providers of one fan-out step are queried concurrently.
    ///
    /// Results merge via commutative set union, so ordering between
    /// providers does not affect the aggregate.
    pub parallel: bool,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(3),
            parallel: true,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
