use crate::emit::{Emitted, Facility};
use crate::model::{AdditionalProperties, Field, Record};
use crate::order::ordered;
use crate::syntax::{self, CodeWriter, Ident};
use crate::types::{Coercion, TypeDescriptor};

/// Emit `from_json` and the `serde::Deserialize` bridge for `record`.
///
/// The input is parsed into a map of raw values first; each present key is then
/// decoded into its field, and required fields are checked once every key has
/// been seen.
#[must_use]
pub fn emit_unmarshal(record: &Record) -> Emitted {
    let mut emitted = Emitted::default();
    emitted.facilities.insert(Facility::BTreeMap);
    emitted.facilities.insert(Facility::RawValue);
    emitted.facilities.insert(Facility::DeError);

    let type_name: Ident = Ident::type_name(&record.name);

    // fields that take part in deserialization, in sorted key order
    let read_fields: Vec<(&str, &Field)> = ordered(&record.fields)
        .into_iter()
        .filter_map(|(_, field)| field.unmarshal_key().map(|key| (key, field)))
        .collect();
    let required: Vec<(&str, String)> = read_fields
        .iter()
        .filter(|(_, field)| field.required)
        .map(|(key, field)| (*key, received_flag(field)))
        .collect();

    let mut w = CodeWriter::new();
    w.blank();
    w.open(format!("impl {type_name}"));
    w.doc(&format!(
        "Deserializes a `{}` from a JSON object.\n\n# Errors\n\n\
         Fails when the input is not a JSON object, a value does not decode as its \
         declared type, or a required field is missing.",
        type_name.bare()
    ));
    w.open("pub fn from_json(input: &str) -> Result<Self, serde_json::Error>");

    let additional_type: Option<&TypeDescriptor> = record.additional.value_type();
    if read_fields.is_empty() && additional_type.is_none() {
        w.line("let _: BTreeMap<String, Box<RawValue>> = serde_json::from_str(input)?;");
        w.line("Ok(Self::default())");
    } else {
        for (_, flag) in &required {
            w.line(format!("let mut {flag} = false;"));
        }
        w.line("let json_map: BTreeMap<String, Box<RawValue>> = serde_json::from_str(input)?;");
        w.line("let mut record = Self::default();");
        w.comment("parse all the defined properties");
        w.open("for (key, value) in json_map");
        w.open("if value.get() == \"null\"");
        w.line("continue;");
        w.close();
        w.open("match key.as_str()");
        for (json_key, field) in &read_fields {
            w.open(format!("{} =>", syntax::str_literal(json_key)));
            emit_field_decode(&mut w, &mut emitted, field);
            if field.required {
                w.line(format!("{} = true;", received_flag(field)));
            }
            w.close();
        }
        emit_default_arm(&mut w, &record.additional);
        w.close();
        w.close();
        for (json_key, flag) in &required {
            w.comment(&format!(
                "check if {} (a required property) was received",
                syntax::str_literal(json_key)
            ));
            w.open(format!("if !{flag}"));
            w.line(format!(
                "return Err(DeError::custom({}));",
                syntax::str_literal(&format!("\"{json_key}\" is required but was not present"))
            ));
            w.close();
        }
        w.line("Ok(record)");
    }
    w.close();
    w.close();

    w.blank();
    w.open(format!("impl<'de> serde::Deserialize<'de> for {type_name}"));
    w.open(
        "fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>",
    );
    w.line("let raw: Box<RawValue> = serde::Deserialize::deserialize(deserializer)?;");
    w.line("Self::from_json(raw.get()).map_err(D::Error::custom)");
    w.close();
    w.close();

    emitted.code = w.finish();
    emitted
}

fn received_flag(field: &Field) -> String {
    format!("{}_received", Ident::new(&field.name).bare())
}

/// Decode `value` into the field, applying the field's coercion.
fn emit_field_decode(w: &mut CodeWriter, emitted: &mut Emitted, field: &Field) {
    let target: String = format!("record.{}", Ident::new(&field.name));
    match field.coercion {
        Coercion::None => {
            w.line(format!("{target} = serde_json::from_str(value.get())?;"));
        }
        Coercion::IntegerFromText => {
            emitted.facilities.insert(Facility::FromStr);
            w.line("let text: String = serde_json::from_str(value.get())?;");
            w.line(format!(
                "{target} = i64::from_str(&text).map_err(<serde_json::Error as DeError>::custom)?;"
            ));
        }
        Coercion::TextFromInteger => {
            w.line("let int_val: i64 = serde_json::from_str(value.get())?;");
            w.line(format!("{target} = int_val.to_string();"));
        }
    }
}

fn emit_default_arm(w: &mut CodeWriter, additional: &AdditionalProperties) {
    match additional {
        AdditionalProperties::Allowed(value_type) => {
            w.open("other =>");
            w.comment(&format!(
                "an additional {} value",
                syntax::str_literal(&value_type.to_string())
            ));
            w.line(format!(
                "let additional_value: {} = serde_json::from_str(value.get())?;",
                value_type.rust_type()
            ));
            w.line("record.additional_properties.insert(other.to_string(), additional_value);");
            w.close();
        }
        AdditionalProperties::Disallowed => {
            w.comment("additional properties are not allowed; unknown keys are skipped");
            w.line("_ => {}");
        }
        AdditionalProperties::Unsupported => {
            w.line("_ => {}");
        }
    }
}
