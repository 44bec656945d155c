//! Model validation for `deny_invalid_model` mode.
//!
//! Walks the whole model and collects every issue without stopping at the
//! first one. Issues are reported in the same sorted order the generator
//! emits code in, so the report is as reproducible as the output.

use heck::{ToSnakeCase, ToUpperCamelCase};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ModelValidationError, ModelValidationIssue, ModelValidationIssueKind};
use crate::json_pointer;
use crate::model::{ADDITIONAL_PROPERTIES_FIELD, Field, Generator, Record};
use crate::order::{ordered, ordered_names};
use crate::syntax::Ident;
use crate::types::TypeDescriptor;

/// Validates `generator`. Returns `Ok(())` if no issues were found, or
/// `Err(ModelValidationError)` with all collected issues.
///
/// # Errors
///
/// Returns every issue found, in alias-then-record order.
pub fn validate_model(generator: &Generator) -> Result<(), ModelValidationError> {
    let mut issues: Vec<ModelValidationIssue> = Vec::new();

    let record_names: BTreeSet<&str> = generator
        .records
        .values()
        .map(|record| record.name.as_str())
        .collect();
    let alias_names: BTreeSet<&str> = generator
        .aliases
        .values()
        .map(|alias| alias.name.as_str())
        .collect();
    let known_types: BTreeSet<&str> = record_names.union(&alias_names).copied().collect();

    for alias_key in ordered_names(&generator.aliases) {
        let alias: &Field = &generator.aliases[alias_key];
        let path: String = json_pointer::alias(alias_key);
        if alias_key != alias.name {
            push_issue(
                &mut issues,
                &path,
                ModelValidationIssueKind::KeyNameMismatch {
                    key: alias_key.to_string(),
                    name: alias.name.clone(),
                },
            );
        }
        check_type_name(&mut issues, &path, &alias.name);
        if record_names.contains(alias.name.as_str()) {
            push_issue(
                &mut issues,
                &path,
                ModelValidationIssueKind::AliasRecordCollision(alias.name.clone()),
            );
        }
        check_references(&mut issues, &path, &alias.field_type, &known_types);
    }

    for (record_key, record) in ordered(&generator.records) {
        validate_record(&mut issues, record_key, record, &known_types);
    }

    let type_names = known_types.iter().map(|name| (*name, Ident::type_name(name)));
    check_escaped_collisions(&mut issues, "", type_names);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ModelValidationError { issues })
    }
}

fn validate_record(
    issues: &mut Vec<ModelValidationIssue>,
    record_key: &str,
    record: &Record,
    known_types: &BTreeSet<&str>,
) {
    let path: String = json_pointer::record(record_key);
    if record_key != record.name {
        push_issue(
            issues,
            &path,
            ModelValidationIssueKind::KeyNameMismatch {
                key: record_key.to_string(),
                name: record.name.clone(),
            },
        );
    }
    check_type_name(issues, &path, &record.name);

    if let Some(value_type) = record.additional.value_type() {
        if record
            .fields
            .values()
            .any(|field| Ident::new(&field.name).bare() == ADDITIONAL_PROPERTIES_FIELD)
        {
            push_issue(
                issues,
                &path,
                ModelValidationIssueKind::AdditionalPropertiesFieldCollision,
            );
        }
        check_references(issues, &path, value_type, known_types);
    }

    // JSON key -> number of fields using it, per direction
    let mut written: BTreeMap<&str, usize> = BTreeMap::new();
    let mut read: BTreeMap<&str, usize> = BTreeMap::new();

    for (field_key, field) in ordered(&record.fields) {
        let field_path: String = json_pointer::field(record_key, field_key);
        if !Ident::is_verbatim(&field.name) {
            push_issue(
                issues,
                &field_path,
                ModelValidationIssueKind::InvalidIdentifier(field.name.clone()),
            );
        } else if field.name != field.name.to_snake_case() {
            push_issue(
                issues,
                &field_path,
                ModelValidationIssueKind::NonIdiomaticName(field.name.clone()),
            );
        }

        if let Some(key) = field.marshal_key() {
            *written.entry(key).or_insert(0) += 1;
        }
        if let Some(key) = field.unmarshal_key() {
            *read.entry(key).or_insert(0) += 1;
        }

        if field.required && field.unmarshal_key().is_none() {
            push_issue(
                issues,
                &field_path,
                ModelValidationIssueKind::RequiredFieldNeverRead,
            );
        }
        if field.required && field.marshal_key().is_some() && !field.field_type.is_optional() {
            push_issue(
                issues,
                &field_path,
                ModelValidationIssueKind::RequiredFieldNotCheckedOnWrite,
            );
        }
        check_references(issues, &field_path, &field.field_type, known_types);
    }

    let field_names = record
        .fields
        .values()
        .map(|field| (field.name.as_str(), Ident::new(&field.name)));
    check_escaped_collisions(issues, &path, field_names);

    for (key, count) in written {
        if count > 1 {
            push_issue(
                issues,
                &path,
                ModelValidationIssueKind::DuplicateMarshalName(key.to_string()),
            );
        }
    }
    for (key, count) in read {
        if count > 1 {
            push_issue(
                issues,
                &path,
                ModelValidationIssueKind::DuplicateUnmarshalName(key.to_string()),
            );
        }
    }
}

fn push_issue(issues: &mut Vec<ModelValidationIssue>, path: &str, kind: ModelValidationIssueKind) {
    issues.push(ModelValidationIssue {
        path: path.to_string(),
        kind,
    });
}

fn check_type_name(issues: &mut Vec<ModelValidationIssue>, path: &str, name: &str) {
    if Ident::is_reserved_type_name(name) {
        push_issue(
            issues,
            path,
            ModelValidationIssueKind::ReservedName(name.to_string()),
        );
    } else if !Ident::is_verbatim(name) {
        push_issue(
            issues,
            path,
            ModelValidationIssueKind::InvalidIdentifier(name.to_string()),
        );
    } else if name != name.to_upper_camel_case() {
        push_issue(
            issues,
            path,
            ModelValidationIssueKind::NonIdiomaticName(name.to_string()),
        );
    }
}

/// Distinct source names must stay distinct once escaped.
fn check_escaped_collisions<'a>(
    issues: &mut Vec<ModelValidationIssue>,
    path: &str,
    names: impl Iterator<Item = (&'a str, Ident)>,
) {
    let mut sources: BTreeMap<String, BTreeSet<&'a str>> = BTreeMap::new();
    for (source, ident) in names {
        sources
            .entry(ident.bare().to_string())
            .or_default()
            .insert(source);
    }
    for (escaped, names) in sources {
        if names.len() > 1 {
            push_issue(
                issues,
                path,
                ModelValidationIssueKind::EscapedNameCollision(escaped),
            );
        }
    }
}

/// Named types must be a record, an alias, or an external `a::B` path.
fn check_references(
    issues: &mut Vec<ModelValidationIssue>,
    path: &str,
    ty: &TypeDescriptor,
    known_types: &BTreeSet<&str>,
) {
    for name in ty.referenced_names() {
        if !name.contains("::") && !known_types.contains(name) {
            push_issue(
                issues,
                path,
                ModelValidationIssueKind::UnknownTypeReference(name.to_string()),
            );
        }
    }
}
