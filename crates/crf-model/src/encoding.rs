//! Comma-delimited list encoding shared by the response option and
//! conditional display fields.
//!
//! A stored list is a single string with `,` between elements; a literal
//! comma inside an element is escaped as `/,`. These strings are what the
//! worksheet pipeline reads and writes, so the separator and escape rules
//! here must stay stable across releases.

/// Encode an ordered sequence of values into one delimited string.
///
/// Literal commas are escaped as `/,` before joining. An empty sequence
/// encodes to the empty string.
pub fn encode_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut encoded = String::new();
    for (index, value) in values.into_iter().enumerate() {
        if index > 0 {
            encoded.push(',');
        }
        encoded.push_str(&value.as_ref().replace(',', "/,"));
    }
    encoded
}

/// Decode a delimited string back into its elements.
///
/// Splits on commas not immediately preceded by `/`, trims whitespace
/// adjacent to each separator, and restores `/,` to `,` in every fragment.
/// Implemented as an explicit scan so the escape rule does not depend on
/// regex lookbehind support.
///
/// An empty input decodes to a single empty element, not an empty list;
/// splitting always yields at least one fragment. Callers that need to
/// distinguish "no list" from "a list with one empty element" must track
/// field absence separately.
pub fn decode_list(encoded: &str) -> Vec<String> {
    let mut fragments: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut previous = None;
    for (index, ch) in encoded.char_indices() {
        if ch == ',' && previous != Some('/') {
            fragments.push(&encoded[start..index]);
            start = index + 1;
        }
        previous = Some(ch);
    }
    fragments.push(&encoded[start..]);

    let last = fragments.len() - 1;
    fragments
        .iter()
        .enumerate()
        .map(|(index, fragment)| {
            // Whitespace around a separator belongs to the separator, not the
            // fragment. The ends of the whole string are left untouched.
            let fragment = if index > 0 {
                fragment.trim_start()
            } else {
                fragment
            };
            let fragment = if index < last {
                fragment.trim_end()
            } else {
                fragment
            };
            fragment.replace("/,", ",")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_plain_values() {
        assert_eq!(encode_list(["Male", "Female"]), "Male,Female");
    }

    #[test]
    fn escapes_embedded_commas() {
        assert_eq!(encode_list(["a,b"]), "a/,b");
        assert_eq!(encode_list(["a,b", "c"]), "a/,b,c");
    }

    #[test]
    fn empty_sequence_encodes_to_empty_string() {
        assert_eq!(encode_list::<[&str; 0], &str>([]), "");
    }

    #[test]
    fn decodes_plain_values() {
        assert_eq!(decode_list("Male,Female"), vec!["Male", "Female"]);
    }

    #[test]
    fn restores_escaped_commas() {
        assert_eq!(decode_list("a/,b"), vec!["a,b"]);
        assert_eq!(decode_list("a/,b,c"), vec!["a,b", "c"]);
    }

    #[test]
    fn empty_string_decodes_to_one_empty_element() {
        assert_eq!(decode_list(""), vec![""]);
    }

    #[test]
    fn trims_whitespace_around_separators_only() {
        assert_eq!(decode_list("a , b"), vec!["a", "b"]);
        assert_eq!(decode_list(" a,b "), vec![" a", "b "]);
    }

    #[test]
    fn keeps_consecutive_separators_as_empty_elements() {
        assert_eq!(decode_list("a,,b"), vec!["a", "", "b"]);
        assert_eq!(decode_list("a,"), vec!["a", ""]);
        assert_eq!(decode_list(","), vec!["", ""]);
    }

    #[test]
    fn literal_escape_sequence_survives_a_round_trip() {
        let values = vec!["a/,b".to_string()];
        assert_eq!(encode_list(&values), "a//,b");
        assert_eq!(decode_list("a//,b"), values);
    }

    #[test]
    fn element_made_only_of_commas_round_trips() {
        let values = vec![",,".to_string(), "x".to_string()];
        let encoded = encode_list(&values);
        assert_eq!(encoded, "/,/,,x");
        assert_eq!(decode_list(&encoded), values);
    }

    #[test]
    fn comma_after_slash_is_not_a_separator() {
        // The slash marks the comma as literal even mid-element.
        assert_eq!(decode_list("10/,5 mg,daily"), vec!["10,5 mg", "daily"]);
    }
}
