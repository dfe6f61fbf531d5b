use chrono::Utc;

/// Milliseconds since the Unix epoch, used in blob keys.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// RFC 3339 timestamp for `created_at` columns filled in locally.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
