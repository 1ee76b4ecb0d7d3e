use chrono::{DateTime, Utc};

/// Current UTC instant
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Number of random bytes in a generated identifier suffix (8 hex chars)
const ID_SUFFIX_BYTES: usize = 4;

/// Generate a human-readable identifier: `{prefix}-{RANDOM_HEX}`.
///
/// The suffix is 8 uppercase hex characters (4 random bytes, ~4.3 billion
/// values per prefix). Collisions are possible and expected to be handled by
/// the caller with a check-against-store retry loop; the store's uniqueness
/// index is the final authority, not this function.
pub fn generate_id(prefix: &str) -> String {
    use rand::Rng;
    let mut bytes = [0u8; ID_SUFFIX_BYTES];
    rand::thread_rng().fill(&mut bytes);
    let suffix: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    format!("{}-{}", prefix, suffix)
}
