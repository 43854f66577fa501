//! Domain primitives: InvestmentId, TimeMs.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an investment (uuid v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InvestmentId(pub Uuid);

impl InvestmentId {
    pub fn generate() -> Self {
        InvestmentId(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(InvestmentId)
    }
}

impl std::fmt::Display for InvestmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time in milliseconds since Unix epoch; the wire and storage format for
/// all timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime. Out-of-range values clamp to the epoch;
    /// timestamps here are user-entered dates, not precision instants.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.0)
            .single()
            .unwrap_or_else(|| Utc.timestamp_millis_opt(0).single().unwrap_or_default())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        TimeMs(dt.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investment_id_roundtrip() {
        let id = InvestmentId::generate();
        let parsed = InvestmentId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_investment_id_parse_rejects_garbage() {
        assert!(InvestmentId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_timems_datetime_roundtrip() {
        let t = TimeMs::new(1_700_000_000_000);
        assert_eq!(TimeMs::from_datetime(t.to_datetime()), t);
    }

    #[test]
    fn test_timems_ordering() {
        assert!(TimeMs::new(1000) < TimeMs::new(2000));
    }
}
