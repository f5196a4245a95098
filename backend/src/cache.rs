//! Redis-backed JSON cache
//!
//! Cache failures are logged and treated as misses; a lookup never fails
//! because Redis is down.

use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Cache key for a barcode lookup
pub fn barcode_key(barcode: &str) -> String {
    format!("barcode:{}", barcode)
}

pub async fn get_json<T: DeserializeOwned>(conn: &mut ConnectionManager, key: &str) -> Option<T> {
    let cached: Option<String> = match redis::cmd("GET").arg(key).query_async(conn).await {
        Ok(value) => value,
        Err(e) => {
            warn!(key, "Redis GET failed: {}", e);
            return None;
        }
    };

    cached.and_then(|raw| match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, "Discarding unreadable cache entry: {}", e);
            None
        }
    })
}

pub async fn set_json<T: Serialize>(conn: &mut ConnectionManager, key: &str, value: &T, ttl_secs: u64) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, "Cache serialization failed: {}", e);
            return;
        }
    };

    let result: redis::RedisResult<()> = redis::cmd("SET")
        .arg(key)
        .arg(raw)
        .arg("EX")
        .arg(ttl_secs)
        .query_async(conn)
        .await;
    if let Err(e) = result {
        warn!(key, "Redis SET failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_key() {
        assert_eq!(barcode_key("3017620422003"), "barcode:3017620422003");
    }
}
