use std::error;
use std::fmt;

/// Error type for record code generation operations.
#[derive(Debug)]
pub enum CodegenError {
    /// I/O error (e.g., reading a model file, writing generated output).
    IoError(std::io::Error),

    /// JSON parsing error while reading a model document.
    JsonError(serde_json::Error),

    /// The model could not be constructed (bad type descriptor, unsupported coercion).
    ModelError(ModelError),

    /// Strict validation found one or more issues (only when
    /// `GenerateSettings::deny_invalid_model` is true).
    ValidationError(ModelValidationError),
}

impl error::Error for CodegenError {}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(io_error) => fmt::Display::fmt(io_error, f),
            Self::JsonError(json_error) => fmt::Display::fmt(json_error, f),
            Self::ModelError(model_error) => fmt::Display::fmt(model_error, f),
            Self::ValidationError(validation_error) => fmt::Display::fmt(validation_error, f),
        }
    }
}

impl From<std::io::Error> for CodegenError {
    fn from(io_error: std::io::Error) -> Self {
        Self::IoError(io_error)
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(json_error: serde_json::Error) -> Self {
        Self::JsonError(json_error)
    }
}

impl From<ModelError> for CodegenError {
    fn from(model_error: ModelError) -> Self {
        Self::ModelError(model_error)
    }
}

impl From<ModelValidationError> for CodegenError {
    fn from(validation_error: ModelValidationError) -> Self {
        Self::ValidationError(validation_error)
    }
}

/// Error raised while constructing the record model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A type descriptor string could not be parsed.
    InvalidTypeDescriptor(String),

    /// A field declares marshal/unmarshal types outside the supported
    /// text/integer coercion pair.
    UnsupportedCoercion {
        field: String,
        marshal_type: String,
        unmarshal_type: String,
    },
}

impl error::Error for ModelError {}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTypeDescriptor(descriptor) => {
                write!(f, "invalid type descriptor {descriptor:?}")
            }
            Self::UnsupportedCoercion {
                field,
                marshal_type,
                unmarshal_type,
            } => write!(
                f,
                "field {field:?}: cannot read {unmarshal_type} into {marshal_type} \
                 (only string<->int coercion is supported)"
            ),
        }
    }
}

/// Kind of issue found by strict model validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationIssueKind {
    /// A name is not a valid Rust identifier and will be escaped in the output.
    InvalidIdentifier(String),
    /// A name does not follow Rust naming conventions (`UpperCamelCase` types,
    /// `snake_case` fields).
    NonIdiomaticName(String),
    /// A map key differs from the `name` of the entry it holds.
    KeyNameMismatch { key: String, name: String },
    /// Two fields of one record write the same JSON key.
    DuplicateMarshalName(String),
    /// Two fields of one record read the same JSON key.
    DuplicateUnmarshalName(String),
    /// A required field is excluded from deserialization (`"-"`).
    RequiredFieldNeverRead,
    /// A required field is not optional-typed, so serialization cannot check it.
    RequiredFieldNotCheckedOnWrite,
    /// A type name refers to neither a record nor an alias.
    UnknownTypeReference(String),
    /// An alias and a record share a name.
    AliasRecordCollision(String),
    /// A record with additional properties already declares `additional_properties`.
    AdditionalPropertiesFieldCollision,
    /// A record or alias name would shadow a name the generated code relies on
    /// (`Option`, `String`, `serde`, ...); it is emitted with a `_` suffix.
    ReservedName(String),
    /// Two different names escape to the same identifier.
    EscapedNameCollision(String),
}

/// How much an issue matters for the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// The output still compiles and behaves as declared, but a name was
    /// escaped or a policy gap applies.
    Warning,
    /// The output will not compile or cannot behave as declared.
    Error,
}

impl ModelValidationIssueKind {
    #[must_use]
    pub const fn severity(&self) -> IssueSeverity {
        match self {
            Self::DuplicateMarshalName(_)
            | Self::DuplicateUnmarshalName(_)
            | Self::UnknownTypeReference(_)
            | Self::AliasRecordCollision(_)
            | Self::AdditionalPropertiesFieldCollision
            | Self::EscapedNameCollision(_) => IssueSeverity::Error,
            Self::InvalidIdentifier(_)
            | Self::NonIdiomaticName(_)
            | Self::KeyNameMismatch { .. }
            | Self::RequiredFieldNeverRead
            | Self::RequiredFieldNotCheckedOnWrite
            | Self::ReservedName(_) => IssueSeverity::Warning,
        }
    }
}

impl fmt::Display for ModelValidationIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(name) => write!(f, "{name:?} is not a valid Rust identifier"),
            Self::NonIdiomaticName(name) => {
                write!(f, "{name:?} does not follow Rust naming conventions")
            }
            Self::KeyNameMismatch { key, name } => {
                write!(f, "map key {key:?} does not match name {name:?}")
            }
            Self::DuplicateMarshalName(key) => {
                write!(f, "JSON key {key:?} is written by more than one field")
            }
            Self::DuplicateUnmarshalName(key) => {
                write!(f, "JSON key {key:?} is read by more than one field")
            }
            Self::RequiredFieldNeverRead => {
                write!(f, "required field is excluded from deserialization")
            }
            Self::RequiredFieldNotCheckedOnWrite => write!(
                f,
                "required field is not optional-typed; serialization does not check it"
            ),
            Self::UnknownTypeReference(name) => {
                write!(f, "type {name:?} is neither a record nor an alias")
            }
            Self::AliasRecordCollision(name) => {
                write!(f, "{name:?} is declared as both an alias and a record")
            }
            Self::AdditionalPropertiesFieldCollision => write!(
                f,
                "record allows additional properties but already declares additional_properties"
            ),
            Self::ReservedName(name) => {
                write!(f, "{name:?} is reserved in generated code and will be suffixed with `_`")
            }
            Self::EscapedNameCollision(name) => {
                write!(f, "several names escape to the identifier {name:?}")
            }
        }
    }
}

/// One validation issue with the JSON Pointer path of the offending model entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelValidationIssue {
    pub path: String,
    pub kind: ModelValidationIssueKind,
}

impl fmt::Display for ModelValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: &str = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.kind)
    }
}

/// All issues collected by strict model validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelValidationError {
    pub issues: Vec<ModelValidationIssue>,
}

impl ModelValidationError {
    /// Keep only the issues of [`IssueSeverity::Error`].
    ///
    /// # Errors
    ///
    /// Returns the remaining issues when at least one is an error.
    pub fn into_errors(self) -> Result<(), Self> {
        let issues: Vec<ModelValidationIssue> = self
            .issues
            .into_iter()
            .filter(|issue| issue.kind.severity() == IssueSeverity::Error)
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self { issues })
        }
    }
}

impl error::Error for ModelValidationError {}

impl fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model validation failed with {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}
