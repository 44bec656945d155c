//! Rust syntax helpers for emission.
//!
//! Names, keys and descriptions come from the model and are never trusted:
//! identifiers are escaped into valid Rust identifiers, text is rendered as
//! escaped string literals, and comments are split so a newline in a
//! description cannot end the comment early.

use std::fmt;

/// Strict and reserved keywords that can be used as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers; these get a trailing underscore instead.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Names that generated code refers to unqualified. A record or alias with one of
/// these names would shadow it, so type names get a trailing underscore instead.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "BTreeMap", "Box", "Clone", "Debug", "DeError", "Default", "FromStr", "Option", "PartialEq",
    "RawValue", "Result", "SerError", "String", "ToString", "Vec", "bool", "core", "f64", "i64",
    "serde", "serde_json", "std", "str",
];

/// An escaped Rust identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
    raw: bool,
}

impl Ident {
    /// Escape `source` into a valid identifier.
    ///
    /// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit gets a `_`
    /// prefix, and keywords become raw identifiers (or get a `_` suffix when raw
    /// syntax is not allowed).
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut name: String = source
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if name.is_empty() {
            name.push_str("unnamed");
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        if NON_RAW_KEYWORDS.contains(&name.as_str()) {
            name.push('_');
            return Self { name, raw: false };
        }
        let raw: bool = RAW_KEYWORDS.contains(&name.as_str());
        Self { name, raw }
    }

    /// Escape `source` as the name of a generated type.
    ///
    /// Like [`Ident::new`], but names in the reserved set get a `_` suffix so the
    /// type cannot shadow anything the emitted code uses.
    #[must_use]
    pub fn type_name(source: &str) -> Self {
        let mut ident: Self = Self::new(source);
        if !ident.raw && RESERVED_TYPE_NAMES.contains(&ident.name.as_str()) {
            ident.name.push('_');
        }
        ident
    }

    /// True when `source` is one of the reserved type names.
    #[must_use]
    pub fn is_reserved_type_name(source: &str) -> bool {
        RESERVED_TYPE_NAMES.contains(&source)
    }

    /// The identifier text without any `r#` prefix, for building derived names.
    #[must_use]
    pub fn bare(&self) -> &str {
        &self.name
    }

    /// True when `source` needed no escaping apart from raw-keyword syntax.
    #[must_use]
    pub fn is_verbatim(source: &str) -> bool {
        Self::new(source).name == source
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw {
            write!(f, "r#{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Render a `::`-separated type path with every segment escaped.
///
/// A single-segment path names a generated record or alias and is escaped the
/// same way as its declaration.
#[must_use]
pub fn type_path(path: &str) -> String {
    if !path.contains("::") {
        return Ident::type_name(path).to_string();
    }
    path.split("::")
        .map(|segment| Ident::new(segment).to_string())
        .collect::<Vec<String>>()
        .join("::")
}

/// Render `text` as a Rust string literal.
#[must_use]
pub fn str_literal(text: &str) -> String {
    format!("{text:?}")
}

/// Render `key` as the Rust string literal of its JSON encoding, e.g. `age` becomes
/// `"\"age\""`.
#[must_use]
pub fn json_key_literal(key: &str) -> String {
    let encoded: String = serde_json::Value::String(key.to_string()).to_string();
    str_literal(&encoded)
}

/// Indentation-aware buffer for emitted code.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Append `header {` and indent.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Dedent and append `}`.
    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedent and append `text` (e.g. `} else {`), re-indenting when it opens a block.
    pub fn close_with(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
        if text.ends_with('{') {
            self.depth += 1;
        }
    }

    /// Append `///` lines for a description; nothing when it is blank.
    pub fn doc(&mut self, description: &str) {
        for line in comment_lines(description) {
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {line}"));
            }
        }
    }

    /// Append `//` lines.
    pub fn comment(&mut self, text: &str) {
        for line in comment_lines(text) {
            self.line(format!("// {line}"));
        }
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Split trimmed text into lines. `\n`, `\r\n` and a lone `\r` all end a line,
/// since rustc rejects a bare carriage return inside a comment.
fn comment_lines(text: &str) -> Vec<&str> {
    let trimmed: &str = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
        .map(str::trim_end)
        .collect()
}
