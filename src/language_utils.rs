use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language utilities for IETF language tag handling
///
/// TMX carries `xml:lang`, `srclang` and `adminlang` as IETF (BCP 47) tags such
/// as `en-US` or `zh-Hant-TW`. This module checks their shape and resolves the
/// primary language subtag against ISO 639.

// RFC 5646 langtag: language[-extlang], script, region, variants,
// extensions, private use; or a private-use tag on its own
static LANGUAGE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?i)(?:",
        r"(?:[a-z]{2,3}(?:-[a-z]{3}){0,3}|[a-z]{4,8})",
        r"(?:-[a-z]{4})?",
        r"(?:-(?:[a-z]{2}|[0-9]{3}))?",
        r"(?:-(?:[a-z0-9]{5,8}|[0-9][a-z0-9]{3}))*",
        r"(?:-[0-9a-wyz](?:-[a-z0-9]{2,8})+)*",
        r"(?:-x(?:-[a-z0-9]{1,8})+)?",
        r"|x(?:-[a-z0-9]{1,8})+",
        r")$"
    ))
    .unwrap()
});

// Grandfathered tags from the IANA registry
const GRANDFATHERED_TAGS: &[&str] = &[
    "en-GB-oed", "i-ami", "i-bnn", "i-default", "i-enochian", "i-hak", "i-klingon", "i-lux",
    "i-mingo", "i-navajo", "i-pwn", "i-tao", "i-tay", "i-tsu", "sgn-BE-FR", "sgn-BE-NL",
    "sgn-CH-DE", "art-lojban", "cel-gaulish", "no-bok", "no-nyn", "zh-guoyu", "zh-hakka",
    "zh-min", "zh-min-nan", "zh-xiang",
];

fn is_grandfathered(tag: &str) -> bool {
    GRANDFATHERED_TAGS.iter().any(|known| known.eq_ignore_ascii_case(tag))
}

fn is_private_use(tag: &str) -> bool {
    tag.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("x-"))
}

/// Validate an IETF language tag and return it unchanged.
///
/// The tag must be well-formed BCP 47. Grandfathered and private-use tags are
/// accepted as they are; any other tag needs a primary subtag that is a known
/// ISO 639-1 or ISO 639-3 code.
pub fn validate_language_tag(tag: &str) -> Result<&str> {
    if is_grandfathered(tag) {
        return Ok(tag);
    }

    if !LANGUAGE_TAG_REGEX.is_match(tag) {
        return Err(anyhow!("Invalid language tag: '{}'", tag));
    }

    if is_private_use(tag) {
        return Ok(tag);
    }

    let primary = primary_subtag(tag);
    if lookup_language(&primary).is_none() {
        return Err(anyhow!("Unknown primary language '{}' in tag '{}'", primary, tag));
    }

    Ok(tag)
}

/// Get the lowercase primary language subtag (`en-US` -> `en`)
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup_language(code: &str) -> Option<Language> {
    match code.len() {
        2 => Language::from_639_1(code),
        3 => Language::from_639_3(code),
        _ => None,
    }
}

/// Get the English language name for a tag (`ja-JP` -> `Japanese`)
pub fn language_name(tag: &str) -> Result<String> {
    let primary = primary_subtag(tag);
    let lang = lookup_language(&primary)
        .ok_or_else(|| anyhow!("Failed to get language from tag: {}", tag))?;

    Ok(lang.to_name().to_string())
}

/// Check if two tags name the same primary language (`en-US` and `eng` match)
pub fn language_tags_match(tag1: &str, tag2: &str) -> bool {
    match (lookup_language(&primary_subtag(tag1)), lookup_language(&primary_subtag(tag2))) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
