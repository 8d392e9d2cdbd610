//! Cache key builders for all DriveHub cache entries.

/// Prefix applied to all DriveHub cache keys.
const PREFIX: &str = "drivehub";

/// Cache key marking a revoked access token by its `jti`.
pub fn jwt_blocklist(jti: &str) -> String {
    format!("{PREFIX}:jwt:blocklist:{jti}")
}
