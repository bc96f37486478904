//! Flattens CVR address structures into one display line.

use serde_json::Value;

use super::value::{path, text, OneOrMany};
use super::NOT_AVAILABLE;

const FREE_TEXT: &str = "fritekst";
const COUNTRY_CODE: &str = "landekode";

/// Address parts in display order. Each entry is a key path into the address object.
const PARTS: &[&[&str]] = &[
    &["vejnavn"],
    &["husnummerFra"],
    &["postnummer"],
    &["postdistrikt"],
    &["kommune", "kommuneNavn"],
];

/// Formats an address source as `street, number, postal code, district, municipality`.
///
/// A list is treated as a history and only its last entry is used. A non-empty
/// free-text override wins over the structured parts. Returns `"N/A"` when
/// nothing usable is present.
pub fn format_address(source: Option<&Value>) -> String {
    let Some(address) = OneOrMany::of(source).last().filter(|v| v.is_object()) else {
        return NOT_AVAILABLE.to_string();
    };

    if let Some(free_text) = text(address.get(FREE_TEXT)) {
        return join_non_empty(free_text.lines());
    }

    let mut parts: Vec<String> = PARTS
        .iter()
        .filter_map(|keys| text(path(address, keys)))
        .collect();
    if let Some(country) = text(address.get(COUNTRY_CODE)) {
        parts.push(country);
    }

    join_non_empty(parts.iter().map(String::as_str))
}

fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined = parts
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}
