use std::collections::BTreeSet;
use std::io::Write;

use crate::emit::{Emitted, Facility, emit_map_view, emit_marshal, emit_unmarshal};
use crate::error::{CodegenError, IssueSeverity};
use crate::model::{ADDITIONAL_PROPERTIES_FIELD, Field, Generator, Record};
use crate::order::ordered;
use crate::settings::GenerateSettings;
use crate::syntax::{self, CodeWriter, Ident};
use crate::validate::validate_model;

/// Generate Rust source for every alias and record in `generator`.
///
/// Output layout: marker line, facility `use` block, aliases, record
/// declarations, then the JSON routines of every code-generating record. All
/// map iteration is sorted, so an unchanged model always yields identical text.
///
/// # Errors
///
/// Returns `CodegenError::ValidationError` when `settings.deny_invalid_model` is
/// set and the model has issues.
pub fn generate(
    generator: &Generator,
    settings: &GenerateSettings,
) -> Result<String, CodegenError> {
    if let Err(validation_error) = validate_model(generator) {
        if settings.deny_invalid_model {
            return Err(validation_error.into());
        }
        for issue in &validation_error.issues {
            match issue.kind.severity() {
                IssueSeverity::Warning => tracing::warn!(path = %issue.path, "{}", issue.kind),
                IssueSeverity::Error => tracing::error!(path = %issue.path, "{}", issue.kind),
            }
        }
    }

    let mut facilities: BTreeSet<Facility> = BTreeSet::new();
    let mut declarations = CodeWriter::new();
    let mut routines: String = String::new();

    for (_, alias) in ordered(&generator.aliases) {
        emit_alias(&mut declarations, alias);
        tracing::debug!(alias = %alias.name, "emitted alias");
    }

    for (_, record) in ordered(&generator.records) {
        let declaration: Emitted = emit_declaration(record);
        facilities.extend(declaration.facilities);
        for line in declaration.code.lines() {
            declarations.line(line);
        }

        if record.generate_code {
            for emitted in [
                emit_marshal(record),
                emit_unmarshal(record),
                emit_map_view(record),
            ] {
                facilities.extend(emitted.facilities);
                routines.push_str(&emitted.code);
            }
        }
        tracing::debug!(
            record = %record.name,
            fields = record.fields.len(),
            generate_code = record.generate_code,
            "emitted record"
        );
    }

    let mut header = CodeWriter::new();
    header.comment(&format!("Code generated by {}. DO NOT EDIT.", settings.marker()));
    if !facilities.is_empty() {
        header.blank();
        for facility in &facilities {
            header.line(facility.to_string());
        }
    }

    let mut output: String = header.finish();
    output.push_str(&declarations.finish());
    output.push_str(&routines);

    tracing::info!(
        records = generator.records.len(),
        aliases = generator.aliases.len(),
        facilities = facilities.len(),
        bytes = output.len(),
        "generated record code"
    );
    Ok(output)
}

/// Generate code for `generator` and write it to `writer`.
///
/// # Errors
///
/// Returns `CodegenError` if generation fails or writing fails.
pub fn write_generated<W: Write>(
    generator: &Generator,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), CodegenError> {
    let output: String = generate(generator, settings)?;
    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn emit_alias(w: &mut CodeWriter, alias: &Field) {
    w.blank();
    w.doc(&alias.description);
    w.line(format!(
        "pub type {} = {};",
        Ident::type_name(&alias.name),
        alias.field_type.rust_type()
    ));
}

/// Emit the struct declaration of `record`.
///
/// Records that generate code get their serde impls from the routines; the
/// others derive them, with attributes carrying the external names.
fn emit_declaration(record: &Record) -> Emitted {
    let mut emitted = Emitted::default();
    let mut w = CodeWriter::new();
    w.blank();
    w.doc(&record.description);
    if record.generate_code {
        w.line("#[derive(Debug, Clone, Default, PartialEq)]");
    } else {
        w.line("#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]");
    }
    w.open(format!("pub struct {}", Ident::type_name(&record.name)));
    for (_, field) in ordered(&record.fields) {
        w.doc(&field.description);
        if !record.generate_code
            && let Some(attribute) = serde_field_attribute(field)
        {
            w.line(attribute);
        }
        w.line(format!(
            "pub {}: {},",
            Ident::new(&field.name),
            field.field_type.rust_type()
        ));
    }
    if let Some(value_type) = record.additional.value_type() {
        emitted.facilities.insert(Facility::BTreeMap);
        w.doc("Properties not declared above, keyed by their JSON name.");
        if !record.generate_code {
            w.line("#[serde(flatten)]");
        }
        w.line(format!(
            "pub {ADDITIONAL_PROPERTIES_FIELD}: BTreeMap<String, {}>,",
            value_type.rust_type()
        ));
    }
    w.close();
    emitted.code = w.finish();
    emitted
}

/// The `#[serde(...)]` attribute of a field in a record with derived serde impls.
fn serde_field_attribute(field: &Field) -> Option<String> {
    let ident: Ident = Ident::new(&field.name);
    let renamed =
        |key: Option<&str>| key.filter(|k| *k != ident.bare()).map(syntax::str_literal);

    let mut parts: Vec<String> = Vec::new();
    match (field.marshal_key(), field.unmarshal_key()) {
        (None, None) => parts.push("skip".to_string()),
        (Some(write), Some(read)) if write == read => {
            if let Some(name) = renamed(Some(write)) {
                parts.push(format!("rename = {name}"));
            }
        }
        (write, read) => {
            if write.is_none() {
                parts.push("skip_serializing".to_string());
            }
            if read.is_none() {
                parts.push("skip_deserializing".to_string());
            }
            let per_direction: Vec<String> = [
                ("serialize", renamed(write)),
                ("deserialize", renamed(read)),
            ]
            .into_iter()
            .filter_map(|(direction, name)| name.map(|n| format!("{direction} = {n}")))
            .collect();
            if !per_direction.is_empty() {
                parts.push(format!("rename({})", per_direction.join(", ")));
            }
        }
    }
    if field.unmarshal_key().is_some() && !field.required && !field.field_type.is_optional() {
        parts.push("default".to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("#[serde({})]", parts.join(", ")))
    }
}
