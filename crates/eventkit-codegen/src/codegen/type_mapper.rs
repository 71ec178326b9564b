//! Go and TypeScript type expressions for command fields and datatypes.

use serde::Serialize;

use crate::diagnostic::CodegenError;
use crate::ir::{
    CommandFieldSpec, CommandSpec, CustomType, DatatypeDef, FieldType, NamedType, Primitive,
    TypeKind,
};
use super::uppercase_first;

/// A type as written in both target languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeExpressions {
    pub go: String,
    pub ts: String,
}

impl TypeExpressions {
    fn new(go: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            go: go.into(),
            ts: ts.into(),
        }
    }

    pub fn of_datatype(def: &DatatypeDef) -> Self {
        Self::new(go_type(def), ts_type(def))
    }
}

/// Maps a command field to its Go struct field type and TypeScript
/// constructor-argument type.
pub fn map_field_type(
    module: &str,
    command: &CommandSpec,
    field: &CommandFieldSpec,
) -> Result<TypeExpressions, CodegenError> {
    let mapped = match &field.field_type {
        FieldType::Text | FieldType::Multiline | FieldType::Password => {
            TypeExpressions::new("string", "string")
        }
        FieldType::Checkbox => TypeExpressions::new("bool", "boolean"),
        FieldType::Integer => TypeExpressions::new("int", "number"),
        FieldType::Date => TypeExpressions::new("guts.Date", "dateRFC3339"),
        // commands have no backend representation for timestamps
        FieldType::DateTime => {
            return Err(CodegenError::UnmappedFieldType {
                module: module.to_string(),
                command: command.command.clone(),
                field: field.key.clone(),
                type_tag: field.field_type.tag(),
            })
        }
        FieldType::Custom(CustomType::String) => TypeExpressions::new("string", "string"),
        FieldType::Custom(CustomType::Integer) => TypeExpressions::new("int", "number"),
        FieldType::Custom(CustomType::Enum(type_ref)) => {
            let name = type_ref.qualified();
            let ts = if field.optional {
                format!("{} | null", name)
            } else {
                name.clone()
            };
            TypeExpressions::new(name, ts)
        }
        FieldType::Custom(CustomType::Struct(type_ref)) => {
            let name = type_ref.qualified();
            TypeExpressions::new(format!("*{}", name), name)
        }
    };

    Ok(mapped)
}

/// Converts a datatype to a Go type expression.
pub fn go_type(def: &DatatypeDef) -> String {
    let base = match &def.kind {
        TypeKind::CustomReference(type_ref) => type_ref.qualified(),
        TypeKind::Primitive(primitive) => match primitive {
            Primitive::String => "string".to_string(),
            Primitive::Boolean => "bool".to_string(),
            Primitive::Integer => "int64".to_string(),
            Primitive::Date => "guts.Date".to_string(),
            Primitive::DateTime => "time.Time".to_string(),
            Primitive::Binary => "[]byte".to_string(),
            Primitive::Object => go_inline_struct(&def.fields),
            Primitive::Array => match def.of.as_deref() {
                Some(of) => format!("[]{}", go_type(of)),
                None => "[]interface{}".to_string(),
            },
        },
    };

    if def.nullable {
        format!("*{}", base)
    } else {
        base
    }
}

fn go_struct_field(key: &str, def: &DatatypeDef) -> String {
    format!("{} {} `json:\"{}\"`", uppercase_first(key), go_type(def), key)
}

fn go_inline_struct(fields: &[(String, DatatypeDef)]) -> String {
    if fields.is_empty() {
        return "struct{}".to_string();
    }

    let fields: Vec<String> = fields
        .iter()
        .map(|(key, def)| go_struct_field(key, def))
        .collect();

    format!("struct {{ {} }}", fields.join("; "))
}

/// Go declaration of a named type.
pub fn go_type_declaration(named: &NamedType) -> String {
    let def = &named.datatype;
    if def.as_primitive() != Some(Primitive::Object) || def.nullable || def.fields.is_empty() {
        return format!("type {} {}", named.name, go_type(def));
    }

    let mut output = format!("type {} struct {{\n", named.name);
    for (key, field) in &def.fields {
        output.push('\t');
        output.push_str(&go_struct_field(key, field));
        output.push('\n');
    }
    output.push('}');
    output
}

/// Converts a datatype to a TypeScript type expression.
pub fn ts_type(def: &DatatypeDef) -> String {
    let base = match &def.kind {
        TypeKind::CustomReference(type_ref) => type_ref.qualified(),
        TypeKind::Primitive(primitive) => match primitive {
            Primitive::String => "string".to_string(),
            Primitive::Boolean => "boolean".to_string(),
            Primitive::Integer => "number".to_string(),
            Primitive::Date => "dateRFC3339".to_string(),
            Primitive::DateTime => "datetimeRFC3339".to_string(),
            Primitive::Binary => "binaryBase64".to_string(),
            Primitive::Object => ts_inline_object(&def.fields),
            Primitive::Array => match def.of.as_deref() {
                Some(of) if of.nullable => format!("({})[]", ts_type(of)),
                Some(of) => format!("{}[]", ts_type(of)),
                None => "unknown[]".to_string(),
            },
        },
    };

    if def.nullable {
        format!("{} | null", base)
    } else {
        base
    }
}

/// Generates an inline TypeScript object type.
fn ts_inline_object(fields: &[(String, DatatypeDef)]) -> String {
    if fields.is_empty() {
        return "Record<string, never>".to_string();
    }

    let fields: Vec<String> = fields
        .iter()
        .map(|(key, def)| format!("{}: {}", key, ts_type(def)))
        .collect();

    format!("{{ {} }}", fields.join("; "))
}

/// TypeScript declaration of a named type.
pub fn ts_type_declaration(named: &NamedType) -> String {
    let def = &named.datatype;
    if def.as_primitive() != Some(Primitive::Object) || def.nullable || def.fields.is_empty() {
        return format!("export type {} = {};", named.name, ts_type(def));
    }

    let mut output = format!("export interface {} {{\n", named.name);
    for (key, field) in &def.fields {
        output.push_str(&format!("\t{}: {};\n", key, ts_type(field)));
    }
    output.push('}');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CrudNature, TypeRef};

    fn prim(p: Primitive) -> DatatypeDef {
        DatatypeDef::primitive(p)
    }

    fn reference(name: &str) -> DatatypeDef {
        DatatypeDef::reference(TypeRef::parse(name).unwrap())
    }

    fn command_with(field_type: FieldType, optional: bool) -> CommandSpec {
        CommandSpec {
            command: "user.create".to_string(),
            title: "Create user".to_string(),
            crud_nature: CrudNature::Create,
            additional_confirmation: None,
            middleware_chain: "authenticated".to_string(),
            ctor_args: vec![],
            fields: vec![CommandFieldSpec {
                key: "Role".to_string(),
                title: "Role".to_string(),
                field_type,
                unit: None,
                validation_regex: None,
                max_length: None,
                optional,
                hide_if_default_value: false,
                help: String::new(),
                placeholder: String::new(),
            }],
            info: vec![],
        }
    }

    fn map(field_type: FieldType, optional: bool) -> Result<TypeExpressions, CodegenError> {
        let command = command_with(field_type, optional);
        map_field_type("users", &command, &command.fields[0])
    }

    #[test]
    fn test_builtin_field_types() {
        assert_eq!(map(FieldType::Text, false).unwrap(), TypeExpressions::new("string", "string"));
        assert_eq!(map(FieldType::Checkbox, false).unwrap(), TypeExpressions::new("bool", "boolean"));
        assert_eq!(map(FieldType::Integer, false).unwrap(), TypeExpressions::new("int", "number"));
        assert_eq!(
            map(FieldType::Date, false).unwrap(),
            TypeExpressions::new("guts.Date", "dateRFC3339")
        );
        assert_eq!(
            map(FieldType::Custom(CustomType::Integer), false).unwrap(),
            TypeExpressions::new("int", "number")
        );
    }

    #[test]
    fn test_datetime_field_is_rejected() {
        let err = map(FieldType::DateTime, false).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnmappedFieldType { ref field, ref type_tag, .. }
                if field == "Role" && type_tag == "datetime"
        ));
    }

    #[test]
    fn test_enum_and_struct_references() {
        let role = TypeRef::parse("Role").unwrap();
        assert_eq!(
            map(FieldType::Custom(CustomType::Enum(role.clone())), false).unwrap(),
            TypeExpressions::new("Role", "Role")
        );
        assert_eq!(
            map(FieldType::Custom(CustomType::Enum(role)), true).unwrap(),
            TypeExpressions::new("Role", "Role | null")
        );

        let profile = TypeRef::parse("accounts.Profile").unwrap();
        assert_eq!(
            map(FieldType::Custom(CustomType::Struct(profile)), false).unwrap(),
            TypeExpressions::new("*accounts.Profile", "accounts.Profile")
        );
    }

    #[test]
    fn test_datatypes() {
        assert_eq!(go_type(&prim(Primitive::Integer)), "int64");
        assert_eq!(ts_type(&prim(Primitive::Binary)), "binaryBase64");
        assert_eq!(go_type(&prim(Primitive::DateTime).with_nullable(true)), "*time.Time");
        assert_eq!(ts_type(&prim(Primitive::Date).with_nullable(true)), "dateRFC3339 | null");

        let list = DatatypeDef::array(reference("billing.Invoice"));
        assert_eq!(go_type(&list), "[]billing.Invoice");
        assert_eq!(ts_type(&list), "billing.Invoice[]");

        let nullable_items = DatatypeDef::array(prim(Primitive::String).with_nullable(true));
        assert_eq!(ts_type(&nullable_items), "(string | null)[]");
        assert_eq!(go_type(&nullable_items), "[]*string");
    }

    #[test]
    fn test_inline_objects() {
        let obj = DatatypeDef::object(vec![
            ("id".to_string(), prim(Primitive::String)),
            ("count".to_string(), prim(Primitive::Integer).with_nullable(true)),
        ]);
        assert_eq!(ts_type(&obj), "{ id: string; count: number | null }");
        assert_eq!(
            go_type(&obj),
            "struct { Id string `json:\"id\"`; Count *int64 `json:\"count\"` }"
        );
        assert_eq!(ts_type(&DatatypeDef::object(vec![])), "Record<string, never>");
    }

    #[test]
    fn test_declarations() {
        let person = NamedType {
            name: "Person".to_string(),
            datatype: DatatypeDef::object(vec![
                ("name".to_string(), prim(Primitive::String)),
                ("tags".to_string(), DatatypeDef::array(prim(Primitive::String))),
            ]),
        };
        assert_eq!(
            go_type_declaration(&person),
            "type Person struct {\n\tName string `json:\"name\"`\n\tTags []string `json:\"tags\"`\n}"
        );
        assert_eq!(
            ts_type_declaration(&person),
            "export interface Person {\n\tname: string;\n\ttags: string[];\n}"
        );

        let ids = NamedType {
            name: "Ids".to_string(),
            datatype: DatatypeDef::array(prim(Primitive::String)),
        };
        assert_eq!(go_type_declaration(&ids), "type Ids []string");
        assert_eq!(ts_type_declaration(&ids), "export type Ids = string[];");
    }
}
