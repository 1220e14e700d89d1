use crate::error::{Error, Result};

/// Default key expression prefix for simulated devices.
pub const KEY_PREFIX: &str = "zensight/devsim";

/// Last key chunk of the telemetry key.
pub const TELEMETRY_SUFFIX: &str = "telemetry";

/// Build the key expression a device publishes its readings on.
///
/// # Example
/// ```
/// use devsim_common::keyexpr::telemetry_key;
///
/// assert_eq!(
///     telemetry_key("zensight/devsim", "sim01"),
///     "zensight/devsim/sim01/telemetry"
/// );
/// ```
pub fn telemetry_key(prefix: &str, device_id: &str) -> String {
    format!(
        "{}/{}/{}",
        prefix.trim_end_matches('/'),
        device_id,
        TELEMETRY_SUFFIX
    )
}

/// Build a wildcard matching all simulated devices under a prefix.
///
/// # Example
/// ```
/// use devsim_common::keyexpr::all_devices_wildcard;
///
/// assert_eq!(all_devices_wildcard("zensight/devsim"), "zensight/devsim/*/telemetry");
/// ```
pub fn all_devices_wildcard(prefix: &str) -> String {
    format!("{}/*/{}", prefix.trim_end_matches('/'), TELEMETRY_SUFFIX)
}

/// Check that a value can be used as a single key chunk.
pub fn validate_chunk(chunk: &str) -> Result<()> {
    if chunk.is_empty() {
        return Err(Error::KeyExpr("empty key chunk".to_string()));
    }

    if let Some(c) = chunk.chars().find(|c| matches!(c, '/' | '*' | '?' | '#' | '$')) {
        return Err(Error::KeyExpr(format!(
            "'{}' contains reserved character '{}'",
            chunk, c
        )));
    }

    Ok(())
}

/// Check that a key prefix is a non-wildcard key expression.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::KeyExpr("key prefix must not be empty".to_string()));
    }
    trimmed.split('/').try_for_each(validate_chunk)
}
