//! Request signing for the alarm-dog wire protocol.

use chrono::Utc;

/// Computes the request signature for `taskid` at `timestamp`.
///
/// The signed string is `"<taskid>&<timestamp><token>"` — decimal task id,
/// a literal `&`, then the decimal unix timestamp immediately followed by
/// the shared secret with no separator. The server recomputes the identical
/// string, so neither the join nor the digest may change.
///
/// # Examples
///
/// ```rust
/// let sign = dog_alarm::sign::sign(123, "abc", 1000);
/// assert_eq!(sign, "08857021c701e000579325b40ed97a4d");
/// ```
pub fn sign(taskid: u64, token: &str, timestamp: i64) -> String {
    format!("{:x}", md5::compute(format!("{taskid}&{timestamp}{token}")))
}

/// Current unix time in seconds, the default signing timestamp.
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}
