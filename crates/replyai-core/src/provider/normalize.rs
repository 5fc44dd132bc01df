//! Reduces raw backend output to exactly three ordered suggestions.
//!
//! Normalization never fails. Output that cannot be interpreted at all
//! becomes [`DEFAULT_SUGGESTIONS`]; output that yields too few usable
//! lines is padded with [`FILLER`].

use tracing::debug;

/// Number of suggestions in every response.
pub const SUGGESTION_COUNT: usize = 3;

/// Padding used when the backend produced too few usable suggestions.
pub const FILLER: &str = "Thanks for your message!";

/// Returned when there is no payload to interpret.
pub const DEFAULT_SUGGESTIONS: [&str; SUGGESTION_COUNT] = [
    "Thanks for your message!",
    "I appreciate the update.",
    "That sounds interesting.",
];

/// Lines this short or shorter are dropped.
const MIN_LINE_CHARS: usize = 5;

/// Normalize the text a backend returned. `None` means the expected field
/// was missing from the response.
pub fn normalize(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        debug!("no usable payload, returning default suggestions");
        return default_suggestions();
    };

    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return fit(list);
    }

    fit(raw.lines().filter_map(clean_line).collect())
}

/// Pad with [`FILLER`] or truncate so exactly three suggestions remain.
pub fn fit(mut suggestions: Vec<String>) -> Vec<String> {
    suggestions.truncate(SUGGESTION_COUNT);
    while suggestions.len() < SUGGESTION_COUNT {
        suggestions.push(FILLER.to_string());
    }
    suggestions
}

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Strip list markers and quotes; drop the line if little is left.
fn clean_line(line: &str) -> Option<String> {
    let cleaned = line
        .trim()
        .trim_start_matches(|c: char| {
            c.is_ascii_digit() || c == '.' || c == '-' || c == '"' || c.is_whitespace()
        })
        .trim_end_matches('"');

    (cleaned.chars().count() > MIN_LINE_CHARS).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_json_array_truncated_to_three() {
        assert_eq!(
            normalize(Some(r#"["a","b","c","d"]"#)),
            strings(&["a", "b", "c"])
        );
    }

    #[test]
    fn test_json_array_taken_verbatim() {
        // Short and numbered entries survive: no line cleanup on this path.
        assert_eq!(
            normalize(Some(r#"  ["1. ok", "\"hi\"", "Sure thing!"]  "#)),
            strings(&["1. ok", "\"hi\"", "Sure thing!"])
        );
    }

    #[test]
    fn test_short_json_array_is_padded() {
        assert_eq!(
            normalize(Some(r#"["Only one"]"#)),
            strings(&["Only one", FILLER, FILLER])
        );
    }

    #[test]
    fn test_single_line_is_padded() {
        assert_eq!(
            normalize(Some("Just one suggestion here.")),
            strings(&[
                "Just one suggestion here.",
                "Thanks for your message!",
                "Thanks for your message!"
            ])
        );
    }

    #[test]
    fn test_numbered_list_is_cleaned() {
        let raw = "1. Sounds great, see you then!\n2. \"I'll be there at eight.\"\n- Can't wait for dinner!\n4. Also maybe bring dessert";
        assert_eq!(
            normalize(Some(raw)),
            strings(&[
                "Sounds great, see you then!",
                "I'll be there at eight.",
                "Can't wait for dinner!"
            ])
        );
    }

    #[test]
    fn test_short_lines_dropped() {
        let raw = "Sure\n\nOK!!!\nAbsolutely, count me in.\n12345";
        assert_eq!(
            normalize(Some(raw)),
            strings(&["Absolutely, count me in.", FILLER, FILLER])
        );
    }

    #[test]
    fn test_six_chars_is_kept() {
        assert_eq!(normalize(Some("Sure!!"))[0], "Sure!!");
    }

    #[test]
    fn test_missing_payload_uses_defaults() {
        assert_eq!(normalize(None), default_suggestions());
    }

    #[test]
    fn test_blank_payload_uses_defaults() {
        assert_eq!(normalize(Some("  \n ")), default_suggestions());
    }

    #[test]
    fn test_non_string_json_falls_back_to_lines() {
        assert_eq!(
            normalize(Some("[1, 2, 3]")),
            strings(&["[1, 2, 3]", FILLER, FILLER])
        );
    }

    #[test]
    fn test_fit_truncates_and_pads() {
        assert_eq!(fit(strings(&["a", "b", "c", "d"])), strings(&["a", "b", "c"]));
        assert_eq!(fit(Vec::new()), strings(&[FILLER, FILLER, FILLER]));
    }

    #[test]
    fn test_always_three() {
        for raw in [None, Some(""), Some("x"), Some("[]"), Some("a\nb\nc\nd\ne\nf")] {
            assert_eq!(normalize(raw).len(), SUGGESTION_COUNT, "raw {raw:?}");
        }
    }
}
