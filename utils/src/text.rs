//! String helpers.

use serde_json::Value;

/// Upper- or lower-case a string value; any other value is returned as is.
#[must_use]
pub fn change_case(value: Value, to_upper: bool) -> Value {
    match value {
        Value::String(s) if to_upper => Value::String(s.to_uppercase()),
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other,
    }
}

/// True for empty strings and strings made only of whitespace.
#[must_use]
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Strip every leading and trailing character found in `charlist`.
///
/// Stripping repeats until the first and last characters are outside the
/// set, so `trim_chars("~0~abc0~", Some("~0"))` yields `"abc"`. `None` trims
/// whitespace.
#[must_use]
pub fn trim_chars<'a>(input: &'a str, charlist: Option<&str>) -> &'a str {
    match charlist {
        Some(set) => input.trim_matches(|c: char| set.contains(c)),
        None => input.trim(),
    }
}

/// Segment `index` of `input` split on `separator`, trimmed.
#[must_use]
pub fn sub_value<'a>(input: &'a str, separator: &str, index: usize) -> Option<&'a str> {
    if separator.is_empty() {
        return (index == 0).then(|| input.trim());
    }
    input.split(separator).nth(index).map(str::trim)
}

/// Replace `{n}` placeholders with the n-th argument.
///
/// Strings are inserted verbatim, other values in their JSON form.
/// Placeholders whose index has no argument are left untouched.
#[must_use]
pub fn format_template(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        if digits > 0 && after[digits..].starts_with('}') {
            let placeholder = &rest[open..open + digits + 2];
            let arg = after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|n| args.get(n));
            match arg {
                Some(Value::String(s)) => out.push_str(s),
                Some(other) => out.push_str(&other.to_string()),
                None => out.push_str(placeholder),
            }
            rest = &rest[open + digits + 2..];
        } else {
            out.push('{');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}
