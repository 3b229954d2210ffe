//! UTC timestamps in the store's serialized form.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with a `Z` suffix, the form persisted in the
/// sheet's `Timestamp` column.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current Unix timestamp in seconds, the form metric sinks expect.
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}
