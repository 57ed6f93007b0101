/// Build a byte key that orders names by prefix, then by numeric suffix value.
///
/// The trailing run of ASCII digits is replaced by an 8-byte big-endian
/// encoding of `value + 1`. Names without a suffix, or with one that does not
/// fit in a `u64`, get eight zero bytes and so sort before `name0`.
pub fn natural_sort_key(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let split = bytes
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map_or(0, |idx| idx + 1);
    let (prefix, digits) = bytes.split_at(split);

    let suffix = std::str::from_utf8(digits)
        .ok()
        .filter(|d| !d.is_empty())
        .and_then(|d| d.parse::<u64>().ok())
        .map_or(0, |n| n.wrapping_add(1));

    let mut key = Vec::with_capacity(prefix.len() + 8);
    key.extend_from_slice(prefix);
    key.extend_from_slice(&suffix.to_be_bytes());
    key
}
