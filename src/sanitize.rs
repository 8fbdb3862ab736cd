// ==============================================================================
// Name Sanitizer
// ==============================================================================
//
// Maps arbitrary XML NCNames (and generated placeholder names like `type0`)
// to legal Avro identifiers, with collision-free suffixing against both the
// fixed Avro reserved-type-name table and whatever names a caller has
// already assigned (record field names, registry type names).

use std::collections::HashSet;

/// Avro's own type-name vocabulary. A sanitized identifier that collides
/// with one of these needs a numeric suffix before it can be used as a
/// record, enum, or field name.
const RESERVED_NAMES: &[&str] = &[
    "boolean", "int", "long", "float", "double", "bytes", "string", "null", "record", "enum",
    "array", "map", "union", "fixed",
];

/// Strip `input` down to a legal Avro identifier.
///
/// - Any character that isn't an ASCII letter, digit, or underscore is
///   dropped, except `.` and `-`, which become `_` in place.
/// - A leading digit gets an underscore prepended.
/// - A result that collides with an Avro reserved type name gets a numeric
///   suffix, starting at `0`, incremented until the candidate is no longer
///   itself a reserved name.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else if c == '.' || c == '-' {
            out.push('_');
        }
        // Everything else is dropped outright.
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    avoid_reserved(out)
}

fn avoid_reserved(name: String) -> String {
    if !RESERVED_NAMES.contains(&name.as_str()) {
        return name;
    }
    let mut suffix = 0u32;
    loop {
        let candidate = format!("{name}{suffix}");
        if !RESERVED_NAMES.contains(&candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Register `name` against `used`, returning a name guaranteed unique within
/// that set. The first occurrence of a name keeps its bare form; later
/// occurrences get a numeric suffix `0`, `1`, … appended until unique.
///
/// Used both for per-record field-name deduplication (§4.1 rule 4) and for
/// keeping generated/explicit Avro type names unique across a schema.
pub fn dedup(used: &mut HashSet<String>, name: &str) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let mut suffix = 0u32;
    loop {
        let candidate = format!("{name}{suffix}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(sanitize("$a#1"), "a1");
    }

    #[test]
    fn dot_and_dash_become_underscore() {
        assert_eq!(sanitize("a.1"), "a_1");
        assert_eq!(sanitize("a-1"), "a_1");
    }

    #[test]
    fn leading_digit_gets_prefixed() {
        assert_eq!(sanitize("1bad"), "_1bad");
    }

    #[test]
    fn reserved_name_gets_suffixed() {
        assert_eq!(sanitize("string"), "string0");
        assert_eq!(sanitize("record"), "record0");
    }

    #[test]
    fn ordinary_identifier_is_untouched() {
        assert_eq!(sanitize("fooBar"), "fooBar");
        assert_eq!(sanitize("_private"), "_private");
    }

    #[test]
    fn dedup_keeps_first_occurrence_bare() {
        let mut used = HashSet::new();
        assert_eq!(dedup(&mut used, "field"), "field");
        assert_eq!(dedup(&mut used, "field"), "field0");
        assert_eq!(dedup(&mut used, "field"), "field1");
    }

    #[test]
    fn dedup_skips_suffixes_already_taken() {
        let mut used = HashSet::new();
        used.insert("field".to_string());
        used.insert("field0".to_string());
        assert_eq!(dedup(&mut used, "field"), "field1");
    }
}
