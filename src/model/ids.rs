use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub String);

impl PatternId {
    /// Time-ordered prefix plus 64 random bits, both base-36.
    pub fn generate() -> Self {
        let now = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
        let millis = u64::try_from(now / 1_000_000).unwrap_or_default();

        let mut bytes = [0u8; 8];
        let random = match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(err) => {
                tracing::warn!(error = ?err, "getrandom failed, using counter for pattern id");
                let seq = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
                let sub_milli = u64::try_from(now % 1_000_000).unwrap_or_default();
                (seq << 20) ^ sub_milli
            }
        };

        PatternId(format!("{}{}", to_base36(millis), to_base36(random)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatternId {
    fn from(s: &str) -> Self {
        PatternId(s.to_string())
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "../tests/model/ids_tests.rs"]
mod tests;
