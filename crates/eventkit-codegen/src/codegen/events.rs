//! Event struct contexts for the Go backend and the docs.

use serde::Serialize;

use crate::ir::{flatten_all, EventDef, Module};
use super::type_mapper::{go_type, ts_type};
use super::{lowercase_first, struct_name_from_key, uppercase_first, DatatypeImports};

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Constructor parameter name for a field key, kept clear of Go keywords and
/// the implicit `meta` parameter.
fn go_param_name(key: &str) -> String {
    let name = lowercase_first(key);
    if name == "meta" || GO_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventFieldContext {
    pub key: String,
    pub go_name: String,
    pub go_type: String,
    pub go_param: String,
    /// Type as shown in docs.
    pub type_name: String,
    pub notes: String,
}

/// Everything the event templates need for one event.
#[derive(Debug, Clone, Serialize)]
pub struct EventContext {
    /// `user.Created`
    pub key: String,
    /// `UserCreated`
    pub struct_name: String,
    pub fields: Vec<EventFieldContext>,
    pub ctor_args: String,
    pub changelog: Vec<String>,
}

fn event_context(def: &EventDef) -> EventContext {
    let fields: Vec<EventFieldContext> = def
        .fields
        .iter()
        .map(|field| EventFieldContext {
            key: field.key.clone(),
            go_name: uppercase_first(&field.key),
            go_type: go_type(&field.datatype),
            go_param: go_param_name(&field.key),
            type_name: ts_type(&field.datatype),
            notes: field.notes.clone(),
        })
        .collect();

    let ctor_args = fields
        .iter()
        .map(|f| format!("{} {}", f.go_param, f.go_type))
        .chain(std::iter::once("meta event.EventMeta".to_string()))
        .collect::<Vec<_>>()
        .join(", ");

    EventContext {
        key: def.event.clone(),
        struct_name: struct_name_from_key(&def.event),
        fields,
        ctor_args,
        changelog: def.changelog.clone(),
    }
}

/// Builds the contexts of every event of a module with their import needs.
pub fn events_context(module: &Module) -> (Vec<EventContext>, DatatypeImports) {
    let roots = module
        .events
        .iter()
        .flat_map(|e| e.fields.iter().map(|f| &f.datatype));
    let imports = DatatypeImports::from_types(&flatten_all(roots));

    (module.events.iter().map(event_context).collect(), imports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DatatypeDef, EventField, Primitive};

    #[test]
    fn test_event_context() {
        let mut module = Module::new("app/users");
        module.events.push(EventDef {
            event: "user.Created".to_string(),
            fields: vec![
                EventField {
                    key: "Name".to_string(),
                    datatype: DatatypeDef::primitive(Primitive::String),
                    notes: "display name".to_string(),
                },
                EventField {
                    key: "type".to_string(),
                    datatype: DatatypeDef::primitive(Primitive::DateTime),
                    notes: String::new(),
                },
            ],
            changelog: vec![],
        });

        let (events, imports) = events_context(&module);
        let created = &events[0];
        assert_eq!(created.struct_name, "UserCreated");
        assert_eq!(
            created.ctor_args,
            "name string, type_ time.Time, meta event.EventMeta"
        );
        assert_eq!(created.fields[1].go_name, "Type");
        assert!(imports.flags.datetime);
        assert!(!imports.flags.date);
        assert!(imports.module_ids.is_empty());
    }
}
