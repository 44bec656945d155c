//! The record model consumed by the generator.
//!
//! The model is built entirely before generation starts, either in code or by
//! deserializing a model document with [`Generator::from_json`]. Construction
//! is the only place type descriptors are parsed and coercions are checked, so
//! the emitters never meet an unsupported type pair.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{CodegenError, ModelError};
use crate::types::{Coercion, TypeDescriptor};

/// External name that excludes a field from one direction of JSON conversion.
pub const SKIP_NAME: &str = "-";

/// Name of the side-map field added to records that accept additional properties.
pub const ADDITIONAL_PROPERTIES_FIELD: &str = "additional_properties";

/// The whole model: records and aliases keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generator {
    pub records: HashMap<String, Record>,
    pub aliases: HashMap<String, Field>,
}

impl Generator {
    /// Parse a model document.
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::JsonError` if the document is not valid JSON or
    /// violates the model shape, and `CodegenError::ModelError` for a bad type
    /// descriptor or an unsupported coercion.
    pub fn from_json(model_json: &str) -> Result<Self, CodegenError> {
        let document: GeneratorDocument = serde_json::from_str(model_json)?;
        let mut records: HashMap<String, Record> = HashMap::with_capacity(document.records.len());
        for (key, record_doc) in document.records {
            records.insert(key, Record::try_from(record_doc)?);
        }
        let mut aliases: HashMap<String, Field> = HashMap::with_capacity(document.aliases.len());
        for (key, alias_doc) in document.aliases {
            aliases.insert(key, alias_doc.into_field(None)?);
        }
        Ok(Self { records, aliases })
    }

    /// Add a record under its own name.
    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.insert(record.name.clone(), record);
        self
    }

    /// Add an alias under its own name.
    #[must_use]
    pub fn with_alias(mut self, alias: Field) -> Self {
        self.aliases.insert(alias.name.clone(), alias);
        self
    }
}

/// Policy for JSON keys that match no declared field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AdditionalProperties {
    /// No additional-property support in the output; unknown keys are ignored.
    #[default]
    Unsupported,
    /// Additional properties are explicitly disallowed; unknown keys are skipped.
    Disallowed,
    /// Unknown keys are decoded as this type into the `additional_properties` side map.
    Allowed(TypeDescriptor),
}

impl AdditionalProperties {
    /// Parse the document form: `""` is unsupported, `"false"` disallowed, anything
    /// else a type descriptor.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidTypeDescriptor` when the type cannot be parsed.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value.trim() {
            "" => Ok(Self::Unsupported),
            "false" => Ok(Self::Disallowed),
            descriptor => Ok(Self::Allowed(descriptor.parse()?)),
        }
    }

    /// The side-map value type, when additional properties are captured.
    #[must_use]
    pub const fn value_type(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Allowed(ty) => Some(ty),
            Self::Unsupported | Self::Disallowed => None,
        }
    }
}

/// A named aggregate of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub description: String,
    pub fields: HashMap<String, Field>,
    pub additional: AdditionalProperties,
    /// When false only the declaration is emitted, with derived serde impls.
    pub generate_code: bool,
}

impl Record {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            fields: HashMap::new(),
            additional: AdditionalProperties::Unsupported,
            generate_code: true,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Add a field keyed by its declaration name.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn with_additional(mut self, additional: AdditionalProperties) -> Self {
        self.additional = additional;
        self
    }

    #[must_use]
    pub const fn declaration_only(mut self) -> Self {
        self.generate_code = false;
        self
    }
}

/// A field of a record, or the target of an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: String,
    /// JSON key written by serialization; [`SKIP_NAME`] omits the field.
    pub marshal_name: String,
    /// JSON key read by deserialization; [`SKIP_NAME`] ignores the key.
    pub unmarshal_name: String,
    /// The declared type, which is also the type written to JSON.
    pub field_type: TypeDescriptor,
    pub coercion: Coercion,
    pub required: bool,
    pub omit_empty: bool,
}

impl Field {
    /// A field whose JSON key on both sides equals its name.
    #[must_use]
    pub fn new(name: &str, field_type: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            marshal_name: name.to_string(),
            unmarshal_name: name.to_string(),
            field_type,
            coercion: Coercion::None,
            required: false,
            omit_empty: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the JSON key used in both directions.
    #[must_use]
    pub fn with_json_name(mut self, json_name: &str) -> Self {
        json_name.clone_into(&mut self.marshal_name);
        json_name.clone_into(&mut self.unmarshal_name);
        self
    }

    #[must_use]
    pub fn with_marshal_name(mut self, marshal_name: &str) -> Self {
        marshal_name.clone_into(&mut self.marshal_name);
        self
    }

    #[must_use]
    pub fn with_unmarshal_name(mut self, unmarshal_name: &str) -> Self {
        unmarshal_name.clone_into(&mut self.unmarshal_name);
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Read this field from JSON as `unmarshal_type`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnsupportedCoercion` unless the types match or form
    /// the string/int pair.
    pub fn with_unmarshal_type(
        mut self,
        unmarshal_type: &TypeDescriptor,
    ) -> Result<Self, ModelError> {
        self.coercion = Coercion::between(&self.name, &self.field_type, unmarshal_type)?;
        Ok(self)
    }

    #[must_use]
    pub fn unmarshal_type(&self) -> TypeDescriptor {
        self.coercion.unmarshal_type(&self.field_type)
    }

    /// The JSON key written for this field, unless it is excluded.
    #[must_use]
    pub fn marshal_key(&self) -> Option<&str> {
        (self.marshal_name != SKIP_NAME).then_some(self.marshal_name.as_str())
    }

    /// The JSON key read into this field, unless it is excluded.
    #[must_use]
    pub fn unmarshal_key(&self) -> Option<&str> {
        (self.unmarshal_name != SKIP_NAME).then_some(self.unmarshal_name.as_str())
    }
}

/// Serialized form of [`Generator`].
#[derive(Debug, Deserialize)]
struct GeneratorDocument {
    #[serde(default)]
    records: HashMap<String, RecordDocument>,

    #[serde(default)]
    aliases: HashMap<String, FieldDocument>,
}

/// Serialized form of [`Record`].
#[derive(Debug, Deserialize)]
struct RecordDocument {
    name: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    fields: HashMap<String, FieldDocument>,

    #[serde(default)]
    additional_type: String,

    #[serde(default = "default_generate_code")]
    generate_code: bool,
}

const fn default_generate_code() -> bool {
    true
}

impl TryFrom<RecordDocument> for Record {
    type Error = ModelError;

    fn try_from(doc: RecordDocument) -> Result<Self, Self::Error> {
        let mut fields: HashMap<String, Field> = HashMap::with_capacity(doc.fields.len());
        for (key, field_doc) in doc.fields {
            let field: Field = field_doc.into_field(Some(&key))?;
            fields.insert(key, field);
        }
        Ok(Self {
            name: doc.name,
            description: doc.description,
            fields,
            additional: AdditionalProperties::parse(&doc.additional_type)?,
            generate_code: doc.generate_code,
        })
    }
}

/// Serialized form of [`Field`]. Missing JSON names default to the map key.
#[derive(Debug, Deserialize)]
struct FieldDocument {
    name: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    marshal_name: Option<String>,

    #[serde(default)]
    unmarshal_name: Option<String>,

    #[serde(rename = "type")]
    field_type: String,

    #[serde(default)]
    unmarshal_type: Option<String>,

    #[serde(default)]
    required: bool,

    #[serde(default)]
    omit_empty: bool,
}

impl FieldDocument {
    fn into_field(self, key: Option<&str>) -> Result<Field, ModelError> {
        let json_name: &str = key.unwrap_or(&self.name);
        let marshal_name: String = self.marshal_name.unwrap_or_else(|| json_name.to_string());
        let unmarshal_name: String = self.unmarshal_name.unwrap_or_else(|| json_name.to_string());
        let field_type: TypeDescriptor = self.field_type.parse()?;
        let coercion: Coercion = match self.unmarshal_type {
            Some(ref descriptor) => {
                Coercion::between(&self.name, &field_type, &descriptor.parse()?)?
            }
            None => Coercion::None,
        };
        Ok(Field {
            name: self.name,
            description: self.description,
            marshal_name,
            unmarshal_name,
            field_type,
            coercion,
            required: self.required,
            omit_empty: self.omit_empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_reads_records_fields_and_aliases() {
        let model_json: &str = r#"{
            "aliases": { "Id": { "name": "Id", "type": "string" } },
            "records": {
                "Person": {
                    "name": "Person",
                    "description": "A person.",
                    "fields": {
                        "name": { "name": "name", "type": "*string", "required": true },
                        "age": { "name": "age", "type": "int", "omit_empty": true },
                        "zip": { "name": "zip", "type": "string", "unmarshal_type": "int",
                                 "marshal_name": "postal_code", "unmarshal_name": "postalCode" }
                    }
                }
            }
        }"#;
        let generator: Generator = Generator::from_json(model_json).expect("model should parse");

        let alias: &Field = &generator.aliases["Id"];
        assert_eq!(alias.field_type, TypeDescriptor::Text);

        let person: &Record = &generator.records["Person"];
        assert!(person.generate_code, "generate_code defaults to true");
        assert_eq!(person.additional, AdditionalProperties::Unsupported);
        assert_eq!(person.description, "A person.");

        let name: &Field = &person.fields["name"];
        assert!(name.required);
        assert_eq!(name.marshal_key(), Some("name"));
        assert_eq!(
            name.field_type,
            TypeDescriptor::Pointer(Box::new(TypeDescriptor::Text))
        );

        let zip: &Field = &person.fields["zip"];
        assert_eq!(zip.coercion, Coercion::TextFromInteger);
        assert_eq!(zip.unmarshal_type(), TypeDescriptor::Integer);
        assert_eq!(zip.marshal_name, "postal_code");
        assert_eq!(zip.unmarshal_name, "postalCode");
    }

    #[test]
    fn json_names_default_to_the_field_key() {
        let model_json: &str = r#"{ "records": { "R": { "name": "R", "fields": {
            "display-name": { "name": "display_name", "type": "string" }
        } } } }"#;
        let generator: Generator = Generator::from_json(model_json).expect("model should parse");
        let field: &Field = &generator.records["R"].fields["display-name"];
        assert_eq!(field.marshal_name, "display-name");
        assert_eq!(field.unmarshal_name, "display-name");
    }

    #[test]
    fn from_json_rejects_unsupported_coercion() {
        let model_json: &str = r#"{ "records": { "R": { "name": "R", "fields": {
            "flag": { "name": "flag", "type": "bool", "unmarshal_type": "string" }
        } } } }"#;
        let err: CodegenError = Generator::from_json(model_json).expect_err("must be rejected");
        match err {
            CodegenError::ModelError(model_error) => assert_eq!(
                model_error,
                ModelError::UnsupportedCoercion {
                    field: "flag".to_string(),
                    marshal_type: "bool".to_string(),
                    unmarshal_type: "string".to_string(),
                }
            ),
            other => panic!("expected a model error, got {other}"),
        }
    }

    #[test]
    fn from_json_rejects_bad_type_descriptor() {
        let model_json: &str = r#"{ "records": { "R": { "name": "R", "fields": {
            "m": { "name": "m", "type": "map[string]int" }
        } } } }"#;
        let err: CodegenError = Generator::from_json(model_json).expect_err("must be rejected");
        let CodegenError::ModelError(ModelError::InvalidTypeDescriptor(descriptor)) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(descriptor, "map[string]int");
    }

    #[test]
    fn from_json_rejects_bad_alias_descriptor() {
        let model_json: &str = r#"{ "aliases": { "Id": { "name": "Id", "type": "*" } } }"#;
        let err: CodegenError = Generator::from_json(model_json).expect_err("must be rejected");
        assert!(matches!(err, CodegenError::ModelError(_)), "{err}");
    }

    #[test]
    fn from_json_reports_shape_errors_as_json_errors() {
        let err: CodegenError =
            Generator::from_json(r#"{ "records": { "R": { "fields": {} } } }"#)
                .expect_err("record name is missing");
        assert!(matches!(err, CodegenError::JsonError(_)), "{err}");
    }

    #[test]
    fn additional_type_tri_state() {
        assert_eq!(AdditionalProperties::parse(""), Ok(AdditionalProperties::Unsupported));
        assert_eq!(AdditionalProperties::parse("false"), Ok(AdditionalProperties::Disallowed));
        assert_eq!(
            AdditionalProperties::parse("int"),
            Ok(AdditionalProperties::Allowed(TypeDescriptor::Integer))
        );
        assert_eq!(
            AdditionalProperties::parse("string").expect("parses").value_type(),
            Some(&TypeDescriptor::Text)
        );
    }

    #[test]
    fn skip_name_excludes_a_direction() {
        let field = Field::new("secret", TypeDescriptor::Text).with_marshal_name(SKIP_NAME);
        assert_eq!(field.marshal_key(), None);
        assert_eq!(field.unmarshal_key(), Some("secret"));
    }

    #[test]
    fn builder_checks_coercion() {
        let count = || Field::new("count", TypeDescriptor::Integer);
        let ok = count().with_unmarshal_type(&TypeDescriptor::Text);
        assert_eq!(ok.map(|f| f.coercion), Ok(Coercion::IntegerFromText));

        let bad = count().with_unmarshal_type(&TypeDescriptor::Float);
        assert!(bad.is_err());
    }
}
