//! Common utility functions used across Ajax components

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 / ISO-8601 string
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encode an identifier as a file stem
///
/// ASCII letters, digits, `-` and `_` are kept; every other byte becomes
/// `%` plus two hex digits. Distinct ids always give distinct stems, and the
/// result never contains a path separator or a dot. The empty id is `%`.
pub fn encode_file_stem(id: &str) -> String {
    if id.is_empty() {
        return "%".to_string();
    }
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push('%');
            stem.push_str(&hex::encode([byte]));
        }
    }
    stem
}

/// Inverse of [`encode_file_stem`]; `None` for stems it never produces
pub fn decode_file_stem(stem: &str) -> Option<String> {
    if stem == "%" {
        return Some(String::new());
    }
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();
    while let Some((&first, tail)) = rest.split_first() {
        if first == b'%' {
            let digits = tail.get(..2)?;
            bytes.extend(hex::decode(digits).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(first);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

/// Drop elements from the front until at most `cap` remain
pub fn keep_last<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

/// True when `haystack` contains any of `needles`
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Capitalize the first character of a string
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
