use serde::Deserialize;
use serde_json::Value;

/// Reads a float that the upstream API may send either as a JSON number or
/// as a numeric string. `null`, a missing field or an unparsable value all
/// become `None`.
pub fn deserialize_opt_f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    })
}

/// Percent-encodes a user supplied value before it lands in a URL path.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value.trim()).into_owned()
}
