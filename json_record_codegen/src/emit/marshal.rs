use crate::emit::{Emitted, Facility};
use crate::model::{AdditionalProperties, Record};
use crate::order::ordered;
use crate::syntax::{self, CodeWriter, Ident};
use crate::zero;

/// Emit `to_json` and the `serde::Serialize` bridge for `record`.
///
/// Fields are written in sorted key order, additional properties after them in
/// the side map's (sorted) order. The first failure aborts the whole record.
#[must_use]
pub fn emit_marshal(record: &Record) -> Emitted {
    let mut emitted = Emitted::default();
    emitted.facilities.insert(Facility::SerError);
    emitted.facilities.insert(Facility::RawValue);

    let type_name: Ident = Ident::type_name(&record.name);
    let mut body = CodeWriter::new();
    let mut pushes_lines: bool = false;

    for (_, field) in ordered(&record.fields) {
        let Some(json_key) = field.marshal_key() else {
            continue;
        };
        let expr: String = format!("self.{}", Ident::new(&field.name));

        if field.required {
            body.comment(&format!("{} is required", syntax::str_literal(json_key)));
            if field.field_type.is_optional() {
                body.open(format!("if {expr}.is_none()"));
                body.line(format!(
                    "return Err(SerError::custom({}));",
                    syntax::str_literal(&format!("{json_key} is a required field"))
                ));
                body.close();
            } else {
                body.comment("only optional-typed required fields are checked on write");
            }
        }

        if field.omit_empty {
            body.comment("omit empty");
            body.open(format!("if {}", zero::non_empty_condition(&field.field_type, &expr)));
        }

        body.comment(&format!("marshal the {} field", syntax::str_literal(json_key)));
        body.line(format!("let tmp: String = serde_json::to_string(&{expr})?;"));
        body.line(format!(
            "lines.push(format!(\"{{}}: {{}}\", {}, tmp));",
            syntax::json_key_literal(json_key)
        ));
        pushes_lines = true;

        if field.omit_empty {
            body.close();
        }
    }

    if let AdditionalProperties::Allowed(_) = record.additional {
        body.comment("marshal any additional properties");
        body.open("for (key, value) in &self.additional_properties");
        body.line("let tmp: String = serde_json::to_string(value)?;");
        body.line("lines.push(format!(\"{}: {}\", serde_json::to_string(key)?, tmp));");
        body.close();
        pushes_lines = true;
    }

    let mut w = CodeWriter::new();
    w.blank();
    w.open(format!("impl {type_name}"));
    w.doc(&format!(
        "Serializes this `{}` as a JSON object.\n\n# Errors\n\n\
         Fails when a required field is absent or a value cannot be serialized.",
        type_name.bare()
    ));
    w.open("pub fn to_json(&self) -> Result<String, serde_json::Error>");
    if pushes_lines {
        w.line("let mut lines: Vec<String> = Vec::new();");
    } else {
        w.line("let lines: Vec<String> = Vec::new();");
    }
    for line in body.finish().lines() {
        w.line(line);
    }
    w.line("Ok(format!(\"{{{}}}\", lines.join(\", \")))");
    w.close();
    w.close();

    w.blank();
    w.open(format!("impl serde::Serialize for {type_name}"));
    w.open("fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>");
    w.line("let json: String = self.to_json().map_err(S::Error::custom)?;");
    w.line("let raw: Box<RawValue> = RawValue::from_string(json).map_err(S::Error::custom)?;");
    w.line("serde::Serialize::serialize(&raw, serializer)");
    w.close();
    w.close();

    emitted.code = w.finish();
    emitted
}
