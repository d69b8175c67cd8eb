use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Unix timestamp `ttl_seconds` from `now`, clamped at zero.
pub fn expiry_after(now: i64, ttl_seconds: i64) -> u64 {
    now.saturating_add(ttl_seconds).max(0) as u64
}
