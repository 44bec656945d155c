//! Generate hand-rolled JSON contracts for Rust records.
//!
//! A [`Generator`] holds records (named field sets) and aliases. For every record
//! that generates code, the output declares the struct plus three routines:
//! `to_json` (with a `serde::Serialize` bridge), `from_json` (with a
//! `serde::Deserialize` bridge) and `to_map`. Output is deterministic: every map
//! in the model is walked in sorted key order.

mod codegen;
mod emit;
mod error;
mod json_pointer;
mod model;
mod order;
mod settings;
mod syntax;
mod types;
mod validate;
mod zero;

pub use codegen::generate;
pub use error::{
    CodegenError, IssueSeverity, ModelError, ModelValidationError, ModelValidationIssue,
    ModelValidationIssueKind,
};
pub use model::{
    ADDITIONAL_PROPERTIES_FIELD, AdditionalProperties, Field, Generator, Record, SKIP_NAME,
};
pub use settings::{DEFAULT_MARKER, GenerateSettings};
pub use types::{Coercion, TypeDescriptor};
pub use validate::validate_model;

use std::io::Write;
use std::path::Path;

/// Generate code from a model document string and write it to `writer`.
///
/// The writer can be any type implementing `Write`, such as `File`, `Vec<u8>`, or
/// `Cursor<Vec<u8>>`, enabling easy unit testing without file system interaction.
///
/// # Errors
///
/// Returns `CodegenError` if the model JSON is invalid, strict validation fails,
/// or writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    model_json: &str,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), CodegenError> {
    let generator: Generator = Generator::from_json(model_json)?;
    codegen::write_generated(&generator, writer, settings)
}

/// Generate code from a model document file and write it to an output file.
///
/// # Errors
///
/// Returns `CodegenError` if reading the input file fails, the model JSON is invalid,
/// strict validation fails, or writing to the output file fails.
pub fn generate_from_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<(), CodegenError> {
    let model_json: String = std::fs::read_to_string(input_path)?;
    let mut output_file: std::fs::File = std::fs::File::create(output_path)?;
    generate_to_writer(&model_json, &mut output_file, settings)
}
