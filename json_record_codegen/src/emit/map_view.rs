use crate::emit::{Emitted, Facility};
use crate::model::Record;
use crate::order::ordered;
use crate::syntax::{self, CodeWriter, Ident};

/// Emit `to_map`, projecting each written field to `marshal name -> value`.
///
/// Additional properties are not part of the projection.
#[must_use]
pub fn emit_map_view(record: &Record) -> Emitted {
    let mut emitted = Emitted::default();
    emitted.facilities.insert(Facility::BTreeMap);

    let type_name: Ident = Ident::type_name(&record.name);
    let entries: Vec<(&str, Ident)> = ordered(&record.fields)
        .into_iter()
        .filter_map(|(_, field)| Some((field.marshal_key()?, Ident::new(&field.name))))
        .collect();

    let mut w = CodeWriter::new();
    w.blank();
    w.open(format!("impl {type_name}"));
    w.doc(&format!(
        "Projects the declared fields of this `{}` into a key/value view.",
        type_name.bare()
    ));
    w.line("#[must_use]");
    w.open("pub fn to_map(&self) -> BTreeMap<String, serde_json::Value>");
    if entries.is_empty() {
        w.line("BTreeMap::new()");
    } else {
        w.line("let mut m: BTreeMap<String, serde_json::Value> = BTreeMap::new();");
        for (json_key, ident) in &entries {
            w.line(format!(
                "m.insert({}.to_string(), serde_json::to_value(&self.{ident}).unwrap_or_default());",
                syntax::str_literal(json_key)
            ));
        }
        w.line("m");
    }
    w.close();
    w.close();

    emitted.code = w.finish();
    emitted
}
