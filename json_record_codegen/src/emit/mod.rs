//! Emitters for the per-record JSON contracts.
//!
//! Each emitter is a pure function of one [`Record`](crate::model::Record): it
//! returns the code it generated together with the facilities (`use` items)
//! that code needs. The orchestrator merges the facility sets and writes them
//! once at the top of the output.

mod map_view;
mod marshal;
mod unmarshal;

pub use map_view::emit_map_view;
pub use marshal::emit_marshal;
pub use unmarshal::emit_unmarshal;

use std::collections::BTreeSet;
use std::fmt;

/// An external item emitted code depends on, declared once per output file.
///
/// Variants are declared in the order of their `use` paths so the derived
/// `Ord` sorts the facility block alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facility {
    /// `serde::de::Error`, for custom deserialization errors.
    DeError,
    /// `serde::ser::Error`, for custom serialization errors.
    SerError,
    /// `serde_json::value::RawValue`, the undecoded form of one JSON value.
    RawValue,
    /// `std::collections::BTreeMap`.
    BTreeMap,
    /// `std::str::FromStr`, for base-10 integer parsing.
    FromStr,
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let item: &str = match self {
            Self::DeError => "serde::de::Error as DeError",
            Self::SerError => "serde::ser::Error as SerError",
            Self::RawValue => "serde_json::value::RawValue",
            Self::BTreeMap => "std::collections::BTreeMap",
            Self::FromStr => "std::str::FromStr",
        };
        write!(f, "use {item};")
    }
}

/// Code produced by one emitter.
#[derive(Debug, Default)]
pub struct Emitted {
    pub code: String,
    pub facilities: BTreeSet<Facility>,
}
