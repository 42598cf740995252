//! Conversions between display names and URL path segments.
//!
//! Encoding is lossy in two cases. Names that already contain a hyphen:
//! "Winston-Salem" and "Winston Salem" share the slug `winston-salem` and both
//! decode to "winston salem", which the store then fails to match. Whitespace
//! runs: "Ho  Chi" and "Ho\tChi" encode to `Ho-Chi` and decode to "Ho Chi".

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ListingError;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Replace every whitespace run with a single hyphen. Case is left alone.
pub fn encode_slug(name: &str) -> String {
    WHITESPACE_RE.replace_all(name, "-").into_owned()
}

/// Replace every hyphen with a space.
pub fn decode_slug(slug: &str) -> String {
    slug.replace('-', " ")
}

/// "new YORK" → "New York". Splits on single spaces, so runs of spaces survive.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Lowercased slug used for state and city segments.
pub fn location_slug(name: &str) -> String {
    encode_slug(&name.trim().to_lowercase())
}

/// Undo the `%20` escaping some routers leave in segments.
pub fn fix_url_string(input: &str) -> String {
    input.replace("%20", " ")
}

/// Decode one location segment taken from a URL.
pub fn parse_segment(segment: &str) -> Result<String, ListingError> {
    let malformed = segment.trim().is_empty()
        || segment
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace());
    if malformed {
        return Err(ListingError::MalformedSlug(segment.to_string()));
    }
    Ok(decode_slug(&fix_url_string(segment)))
}

/// Plain ASCII digits with no sign and no leading zero, so one number has
/// exactly one spelling in a URL.
pub fn is_decimal_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_collapses_whitespace_runs() {
        assert_eq!(encode_slug("Ho  Chi\tMinh"), "Ho-Chi-Minh");
        assert_eq!(encode_slug("San Jose"), "San-Jose");
    }

    #[test]
    fn round_trip_without_hyphens() {
        for name in ["Ho Chi Minh", "san jose", "Houston", "", "A B C D"] {
            assert_eq!(decode_slug(&encode_slug(name)), name);
        }
    }

    #[test]
    fn hyphenated_names_are_ambiguous() {
        assert_eq!(decode_slug(&encode_slug("Winston-Salem")), "Winston Salem");
        assert_eq!(encode_slug("Winston-Salem"), encode_slug("Winston Salem"));
    }

    #[test]
    fn whitespace_runs_do_not_round_trip() {
        assert_eq!(decode_slug(&encode_slug("Ho  Chi")), "Ho Chi");
        assert_eq!(decode_slug(&encode_slug("Ho\tChi")), "Ho Chi");
    }

    #[test]
    fn decimal_segments() {
        assert!(is_decimal_segment("0"));
        assert!(is_decimal_segment("120"));
        assert!(!is_decimal_segment(""));
        assert!(!is_decimal_segment("+2"));
        assert!(!is_decimal_segment("002"));
        assert!(!is_decimal_segment(" 2"));
        assert!(!is_decimal_segment("２"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("SAN jOSE"), "San Jose");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("a  b"), "A  B");
    }

    #[test]
    fn location_slug_lowercases() {
        assert_eq!(location_slug("San Jose"), "san-jose");
        assert_eq!(location_slug("California"), "california");
    }

    #[test]
    fn fix_url_string_unescapes_spaces() {
        assert_eq!(fix_url_string("san%20jose"), "san jose");
    }

    #[test]
    fn parse_segment_decodes() {
        assert_eq!(parse_segment("san-jose").unwrap(), "san jose");
        assert_eq!(parse_segment("san%20jose").unwrap(), "san jose");
    }

    #[test]
    fn parse_segment_rejects_malformed() {
        for seg in ["", "  ", "a/b", "a b", "x?y", "x#y"] {
            assert!(
                matches!(parse_segment(seg), Err(ListingError::MalformedSlug(_))),
                "accepted {:?}",
                seg
            );
        }
    }
}
