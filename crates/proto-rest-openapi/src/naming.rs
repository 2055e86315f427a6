//! Identifier normalization for schema keys, body selectors and JSON names.

/// Collapse a dotted qualified name into a single schema-registry key.
///
/// Every dot-separated segment gets its first letter upper-cased and the
/// dots are dropped: `helloworld.Greeter` → `HelloworldGreeter`. A leading
/// dot (descriptor type names look like `.helloworld.HelloRequest`) yields an
/// empty first segment and vanishes.
#[must_use]
pub fn normalize_qualified_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for segment in name.split('.') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// `CamelCase` an underscore-separated identifier.
///
/// A leading `_` becomes `X`, an interior `_` followed by a lowercase letter
/// is dropped and the letter upper-cased, digits pass through, and the first
/// letter of every word is upper-cased. `_my_field_name_2` → `XMyFieldName_2`.
#[must_use]
pub fn camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 1);
    let mut i = 0;

    if chars.first() == Some(&'_') {
        result.push('X');
        i = 1;
    }

    while i < chars.len() {
        let c = chars[i];
        if c == '_' && chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            result.push(c);
            i += 1;
            continue;
        }

        // Start of a word: force upper case, then take the lowercase run.
        result.push(c.to_ascii_uppercase());
        while chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
            i += 1;
            result.push(chars[i]);
        }
        i += 1;
    }

    result
}

/// [`camel_case`] applied to every segment of a dotted field selector.
#[must_use]
pub fn camel_case_path(selector: &str) -> String {
    selector
        .split('.')
        .map(camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

/// Convert `snake_case` to `lowerCamelCase` (protoc's default JSON name).
#[must_use]
pub fn lower_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Flatten a proto comment into a one-line description.
///
/// Drops `//` markers and line breaks, then trims surrounding whitespace.
#[must_use]
pub fn comment_to_description(comment: &str) -> String {
    comment
        .replace("//", "")
        .replace(['\n', '\r'], "")
        .trim()
        .to_string()
}
