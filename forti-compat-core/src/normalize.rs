use std::net::Ipv4Addr;

use serde_json::Value;

/// Rewrite a stored `"ip mask"` pair as CIDR when the new value uses CIDR.
///
/// Returns `old` unchanged unless `new != old`, `new` contains `/` and `old`
/// contains a space. A mask that is not a contiguous IPv4 netmask yields a
/// prefix length of 0.
pub fn ip_mask_to_cidr(new: &str, old: &str) -> String {
    if new == old || !new.contains('/') || !old.contains(' ') {
        return old.to_string();
    }

    let mut parts = old.split(' ');
    let (Some(ip), Some(mask)) = (parts.next(), parts.next()) else {
        return old.to_string();
    };
    let prefix = mask
        .parse::<Ipv4Addr>()
        .ok()
        .and_then(|mask| ipnet::ipv4_mask_to_prefix(mask).ok())
        .unwrap_or(0);
    format!("{ip}/{prefix}")
}

/// Quote a PEM body the way the device stores certificates.
///
/// A non-empty string not already starting with `"` has trailing newlines
/// removed and is wrapped in double quotes. Other values pass through.
pub fn to_cert_format(value: Value) -> Value {
    match value {
        Value::String(s) if !s.is_empty() && !s.starts_with('"') => {
            Value::String(format!("\"{}\"", s.trim_end_matches('\n')))
        }
        other => other,
    }
}
