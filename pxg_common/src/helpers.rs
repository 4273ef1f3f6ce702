/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse a probability in the closed range [0, 1]. Values outside the range are clamped. Anything that isn't a number
/// yields `None`.
pub fn parse_probability(value: &str) -> Option<f64> {
    let p = value.trim().parse::<f64>().ok()?;
    if p.is_nan() {
        return None;
    }
    Some(p.clamp(0.0, 1.0))
}
