//! Character reference decoding for raw HTML text and attribute values.
//!
//! Only numeric references and a handful of named ones are recognized.
//! Anything else, including out-of-range code points, stays verbatim.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("invalid entity regex")
});

/// Decode character references in `text`.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY_PATTERN.replace_all(text, |caps: &regex::Captures| {
        let entity = &caps[1];
        resolve(entity).map_or_else(|| caps[0].to_owned(), String::from)
    })
}

fn resolve(entity: &str) -> Option<char> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }

    if let Some(decimal) = entity.strip_prefix('#') {
        return decimal.parse::<u32>().ok().and_then(char::from_u32);
    }

    Some(match entity {
        "amp" => '&',
        "apos" => '\'',
        "gt" => '>',
        "lt" => '<',
        "nbsp" => '\u{a0}',
        "quot" => '"',
        _ => return None,
    })
}
