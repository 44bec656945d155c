//! Type descriptors for record fields and aliases.
//!
//! A descriptor is written as text in the model document (`"int"`, `"*Address"`,
//! `"[]string"`) and parsed into the closed [`TypeDescriptor`] sum type. Every
//! decision the emitters make about a type (its Rust spelling, its zero value,
//! which coercion applies) is a match over this enum.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::syntax;

/// The declared type of a field or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Boolean,
    Integer,
    Float,
    Text,
    /// Untyped JSON array.
    Array,
    /// Any JSON value, `null` when empty.
    Null,
    /// Optional value; the only kind with an "absent" representation.
    Pointer(Box<TypeDescriptor>),
    /// Homogeneous list.
    Slice(Box<TypeDescriptor>),
    /// A record, an alias, or an external type path such as `serde_json::Value`.
    Other(String),
}

impl TypeDescriptor {
    /// True when the type can represent absence (`Option<_>`).
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Render the Rust type used in declarations and emitted code.
    ///
    /// Pointers to named types are boxed so that records may refer to themselves.
    #[must_use]
    pub fn rust_type(&self) -> String {
        match self {
            Self::Boolean => "bool".to_string(),
            Self::Integer => "i64".to_string(),
            Self::Float => "f64".to_string(),
            Self::Text => "String".to_string(),
            Self::Array => "Vec<serde_json::Value>".to_string(),
            Self::Null => "serde_json::Value".to_string(),
            Self::Pointer(inner) => match inner.as_ref() {
                Self::Other(_) => format!("Option<Box<{}>>", inner.rust_type()),
                _ => format!("Option<{}>", inner.rust_type()),
            },
            Self::Slice(inner) => format!("Vec<{}>", inner.rust_type()),
            Self::Other(name) => syntax::type_path(name),
        }
    }

    /// Names of every `Other` type this descriptor mentions.
    pub(crate) fn referenced_names(&self) -> Vec<&str> {
        match self {
            Self::Pointer(inner) | Self::Slice(inner) => inner.referenced_names(),
            Self::Other(name) => vec![name.as_str()],
            _ => Vec::new(),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = ModelError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = descriptor.trim();
        if let Some(inner) = trimmed.strip_prefix('*') {
            return Ok(Self::Pointer(Box::new(inner.parse()?)));
        }
        if let Some(inner) = trimmed.strip_prefix("[]") {
            return Ok(Self::Slice(Box::new(inner.parse()?)));
        }
        let parsed: Self = match trimmed {
            "bool" | "boolean" => Self::Boolean,
            "int" | "integer" => Self::Integer,
            "float64" | "float" | "number" => Self::Float,
            "string" => Self::Text,
            "array" => Self::Array,
            "nil" | "null" => Self::Null,
            other => {
                let valid_path: bool = !other.is_empty()
                    && other.split("::").all(|segment| {
                        !segment.is_empty()
                            && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
                    });
                if !valid_path {
                    return Err(ModelError::InvalidTypeDescriptor(descriptor.to_string()));
                }
                Self::Other(other.to_string())
            }
        };
        Ok(parsed)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "bool"),
            Self::Integer => write!(f, "int"),
            Self::Float => write!(f, "float64"),
            Self::Text => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Null => write!(f, "nil"),
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(inner) => write!(f, "[]{inner}"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// How a field's JSON input is converted into its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Coercion {
    /// Input has the declared type.
    #[default]
    None,
    /// Declared `int`, read from a base-10 JSON string.
    IntegerFromText,
    /// Declared `string`, read from a JSON integer and stored as decimal text.
    TextFromInteger,
}

impl Coercion {
    /// Resolve the coercion needed to read `unmarshal_type` into a field declared as
    /// `marshal_type`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnsupportedCoercion` for any mismatched pair other than
    /// string/int.
    pub fn between(
        field: &str,
        marshal_type: &TypeDescriptor,
        unmarshal_type: &TypeDescriptor,
    ) -> Result<Self, ModelError> {
        match (marshal_type, unmarshal_type) {
            (marshal, unmarshal) if marshal == unmarshal => Ok(Self::None),
            (TypeDescriptor::Integer, TypeDescriptor::Text) => Ok(Self::IntegerFromText),
            (TypeDescriptor::Text, TypeDescriptor::Integer) => Ok(Self::TextFromInteger),
            (marshal, unmarshal) => Err(ModelError::UnsupportedCoercion {
                field: field.to_string(),
                marshal_type: marshal.to_string(),
                unmarshal_type: unmarshal.to_string(),
            }),
        }
    }

    /// The type read from JSON for a field declared as `marshal_type`.
    #[must_use]
    pub fn unmarshal_type(self, marshal_type: &TypeDescriptor) -> TypeDescriptor {
        match self {
            Self::None => marshal_type.clone(),
            Self::IntegerFromText => TypeDescriptor::Text,
            Self::TextFromInteger => TypeDescriptor::Integer,
        }
    }
}
