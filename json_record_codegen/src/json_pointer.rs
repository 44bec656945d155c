//! JSON Pointers (RFC 6901) into the model document.
//!
//! Validation issues carry a pointer such as `/records/Person/fields/age` so a
//! reader can find the entry in the document the model was loaded from.

/// Appends one reference token, escaping `~` as `~0` and `/` as `~1`.
fn push_token(path: &mut String, token: &str) {
    path.push('/');
    for c in token.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Builds a pointer from unescaped reference tokens.
#[must_use]
pub fn from_tokens(tokens: &[&str]) -> String {
    let mut path: String = String::new();
    for token in tokens {
        push_token(&mut path, token);
    }
    path
}

/// Pointer to the record stored under `record_key`.
#[must_use]
pub fn record(record_key: &str) -> String {
    from_tokens(&["records", record_key])
}

/// Pointer to the field stored under `field_key` in the record under `record_key`.
#[must_use]
pub fn field(record_key: &str, field_key: &str) -> String {
    from_tokens(&["records", record_key, "fields", field_key])
}

/// Pointer to the alias stored under `alias_key`.
#[must_use]
pub fn alias(alias_key: &str) -> String {
    from_tokens(&["aliases", alias_key])
}
