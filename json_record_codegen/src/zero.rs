//! Zero-value resolution for omit-empty checks.

use crate::types::TypeDescriptor;

/// The canonical empty representation of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroValue {
    /// `None`, for optional types.
    Absent,
    /// An empty string, list or array.
    Empty,
    /// `false`.
    False,
    /// A numeric zero literal (`0`, `0.0`).
    Literal(&'static str),
    /// JSON `null`.
    Null,
}

impl ZeroValue {
    /// Render the expression that is true when `expr` is *not* this zero value.
    #[must_use]
    pub fn non_empty_test(self, expr: &str) -> String {
        match self {
            Self::Absent => format!("{expr}.is_some()"),
            Self::Empty => format!("!{expr}.is_empty()"),
            Self::False => expr.to_string(),
            Self::Literal(literal) => format!("{expr} != {literal}"),
            Self::Null => format!("!{expr}.is_null()"),
        }
    }
}

/// Resolve the zero value of `ty`, or `None` when emptiness has to be checked
/// structurally (`value != <T>::default()`).
#[must_use]
pub fn zero_value(ty: &TypeDescriptor) -> Option<ZeroValue> {
    match ty {
        TypeDescriptor::Pointer(_) => Some(ZeroValue::Absent),
        TypeDescriptor::Slice(_) | TypeDescriptor::Array | TypeDescriptor::Text => {
            Some(ZeroValue::Empty)
        }
        TypeDescriptor::Boolean => Some(ZeroValue::False),
        TypeDescriptor::Integer => Some(ZeroValue::Literal("0")),
        TypeDescriptor::Float => Some(ZeroValue::Literal("0.0")),
        TypeDescriptor::Null => Some(ZeroValue::Null),
        TypeDescriptor::Other(_) => None,
    }
}

/// Render the omit-empty condition for `expr` of type `ty`.
#[must_use]
pub fn non_empty_condition(ty: &TypeDescriptor, expr: &str) -> String {
    match zero_value(ty) {
        Some(zero) => zero.non_empty_test(expr),
        None => format!("{expr} != <{}>::default()", ty.rust_type()),
    }
}
