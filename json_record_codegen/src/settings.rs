//! Settings for record code generation.

/// Tool name written into the generated-file marker by default.
pub const DEFAULT_MARKER: &str = "json-record-codegen";

/// Settings that control code generation behavior.
#[derive(Debug, Clone, Default)]
pub struct GenerateSettings {
    /// When true, validate the model before generating and fail with every
    /// issue found.
    ///
    /// **Default: false (disabled).** In the lenient default the issues are
    /// logged as warnings and code is generated anyway.
    pub deny_invalid_model: bool,

    /// Tool name used in the `// Code generated by <marker>. DO NOT EDIT.` line.
    /// `None` uses [`DEFAULT_MARKER`].
    pub marker: Option<String>,
}

impl GenerateSettings {
    /// The marker tool name in effect.
    #[must_use]
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_MARKER)
    }
}
