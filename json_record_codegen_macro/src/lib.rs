//! Procedural macro `json_records!` for json-record-codegen.
//!
//! Expands a model document (given as a string literal) into the same code the
//! `jsonrecordgen` binary writes to a file:
//!
//! ```ignore
//! json_records!(r#"{
//!     "records": {
//!         "Point": {
//!             "name": "Point",
//!             "fields": { "x": { "name": "x", "type": "int" } }
//!         }
//!     }
//! }"#);
//! ```
//!
//! The expansion refers to `serde` and `serde_json` (with the `raw_value`
//! feature), so the calling crate must depend on both.
//!
//! The expansion also carries the `use` items its routines need (`BTreeMap`,
//! `RawValue`, `FromStr`, and serde's error traits as `DeError`/`SerError`).
//! Invoke the macro at most once per module: a second invocation in the same
//! module repeats those imports. Put each model in its own module, or merge the
//! documents into one.

use json_record_codegen::{
    GenerateSettings, Generator, ModelValidationError, generate, validate_model,
};
use proc_macro::TokenStream;
use syn::{LitStr, parse_macro_input};

/// Generate record declarations and their JSON routines from a model document.
///
/// Model issues that would make the expansion fail to compile or misbehave
/// (duplicate JSON names, unknown types, name collisions) are compile errors.
/// Issues the generator works around, such as escaped names or unchecked
/// required fields, do not stop the expansion.
#[proc_macro]
pub fn json_records(input: TokenStream) -> TokenStream {
    let model: LitStr = parse_macro_input!(input as LitStr);
    match expand(&model.value()) {
        Ok(tokens) => tokens.into(),
        Err(message) => syn::Error::new(model.span(), message)
            .to_compile_error()
            .into(),
    }
}

fn expand(model_json: &str) -> Result<proc_macro2::TokenStream, String> {
    let generator: Generator = Generator::from_json(model_json).map_err(|e| e.to_string())?;
    validate_model(&generator)
        .or_else(ModelValidationError::into_errors)
        .map_err(|e| e.to_string())?;
    let settings = GenerateSettings {
        deny_invalid_model: false,
        marker: Some("json_records!".to_string()),
    };
    let code: String = generate(&generator, &settings).map_err(|e| e.to_string())?;
    code.parse::<proc_macro2::TokenStream>()
        .map_err(|e| format!("generated code does not tokenize: {e}"))
}
