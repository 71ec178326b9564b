//! Structure validation of a module.
//!
//! Checks uniqueness of every declared name, that constructor arguments
//! name existing fields, and that no field shadows a generated Go method.

use std::collections::{HashMap, HashSet};

use crate::codegen::enums::member_key;
use crate::codegen::uppercase_first;
use crate::diagnostic::CodegenError;
use crate::ir::{CommandSpec, Module, UiRouteSpec};

/// Fails on the first name seen twice.
fn ensure_unique<'a>(
    module: &str,
    location: &str,
    what: &'static str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), CodegenError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CodegenError::Duplicate {
                module: module.to_string(),
                location: location.to_string(),
                what,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Methods generated on every event struct.
const EVENT_METHODS: &[&str] = &["Meta", "MetaType"];

/// Methods generated on every command struct.
const COMMAND_METHODS: &[&str] = &["Key", "Validate", "MiddlewareChain"];

/// Go field names are the keys with the first letter uppercased.
fn ensure_not_reserved<'a>(
    module: &str,
    location: &str,
    reserved: &[&'static str],
    keys: impl IntoIterator<Item = &'a str>,
) -> Result<(), CodegenError> {
    for key in keys {
        let go_name = uppercase_first(key);
        if let Some(method) = reserved.iter().copied().find(|m| *m == go_name) {
            return Err(CodegenError::ReservedName {
                module: module.to_string(),
                location: location.to_string(),
                name: key.to_string(),
                method,
            });
        }
    }
    Ok(())
}

/// Module ids are the last path segment and must be unique across a run,
/// since qualified references and imports are keyed by id.
pub fn validate_module_ids(modules: &[Module]) -> Result<(), CodegenError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for module in modules {
        if let Some(first) = seen.insert(&module.id, &module.path) {
            return Err(CodegenError::Duplicate {
                module: module.id.clone(),
                location: format!("modules '{}' and '{}'", first, module.path),
                what: "module id",
                name: module.id.clone(),
            });
        }
    }
    Ok(())
}

/// Validates the structure of a module.
pub fn validate_structure(module: &Module) -> Result<(), CodegenError> {
    let id = module.id.as_str();
    let types = &module.types;

    ensure_unique(
        id,
        "types",
        "type",
        types
            .types
            .iter()
            .map(|t| t.name.as_str())
            .chain(types.enums.iter().map(|e| e.name.as_str())),
    )?;
    ensure_unique(id, "types", "string const", types.string_consts.iter().map(|c| c.key.as_str()))?;
    ensure_unique(id, "types", "endpoint", types.endpoints.iter().map(|e| e.name.as_str()))?;

    for enum_def in &types.enums {
        let location = format!("enum '{}'", enum_def.name);
        ensure_unique(id, &location, "enum member", enum_def.members.iter().map(String::as_str))?;

        // distinct values may still collide once turned into identifiers
        let keys: Vec<String> = enum_def.members.iter().map(|m| member_key(m)).collect();
        ensure_unique(id, &location, "enum member key", keys.iter().map(String::as_str))?;
    }

    ensure_unique(id, "events", "event", module.events.iter().map(|e| e.event.as_str()))?;
    for event in &module.events {
        let location = format!("event '{}'", event.event);
        ensure_unique(id, &location, "field", event.fields.iter().map(|f| f.key.as_str()))?;
        ensure_not_reserved(id, &location, EVENT_METHODS, event.fields.iter().map(|f| f.key.as_str()))?;
    }

    ensure_unique(id, "commands", "command", module.commands.iter().map(|c| c.command.as_str()))?;
    for command in &module.commands {
        validate_command(id, command)?;
    }

    ensure_unique(id, "ui routes", "route", module.ui_routes.iter().map(|r| r.id.as_str()))?;
    for route in &module.ui_routes {
        validate_route(id, route)?;
    }

    Ok(())
}

fn validate_command(module: &str, command: &CommandSpec) -> Result<(), CodegenError> {
    let location = format!("command '{}'", command.command);
    ensure_unique(module, &location, "field", command.fields.iter().map(|f| f.key.as_str()))?;
    ensure_unique(module, &location, "constructor argument", command.ctor_args.iter().map(String::as_str))?;
    ensure_not_reserved(module, &location, COMMAND_METHODS, command.fields.iter().map(|f| f.key.as_str()))?;

    for arg in &command.ctor_args {
        if command.field(arg).is_none() {
            return Err(CodegenError::UnknownCtorArg {
                module: module.to_string(),
                command: command.command.clone(),
                arg: arg.clone(),
            });
        }
    }

    Ok(())
}

/// Query keys must differ from each other and from path placeholders.
fn validate_route(module: &str, route: &UiRouteSpec) -> Result<(), CodegenError> {
    ensure_unique(
        module,
        &format!("route '{}'", route.id),
        "query parameter",
        route
            .path
            .path_placeholders
            .iter()
            .map(String::as_str)
            .chain(route.query.iter().map(|q| q.key.as_str())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::routes::parse_path_template;
    use crate::diagnostic::ErrorCategory;
    use crate::ir::{
        CommandFieldSpec, CrudNature, DatatypeDef, EnumDef, EventDef, EventField, FieldType,
        Primitive, QueryParamSpec, QueryParamType,
    };

    fn field(key: &str) -> CommandFieldSpec {
        CommandFieldSpec {
            key: key.to_string(),
            title: key.to_string(),
            field_type: FieldType::Text,
            unit: None,
            validation_regex: None,
            max_length: None,
            optional: false,
            hide_if_default_value: false,
            help: String::new(),
            placeholder: String::new(),
        }
    }

    fn command(fields: Vec<CommandFieldSpec>, ctor_args: &[&str]) -> CommandSpec {
        CommandSpec {
            command: "user.rename".to_string(),
            title: "Rename".to_string(),
            crud_nature: CrudNature::Update,
            additional_confirmation: None,
            middleware_chain: "authenticated".to_string(),
            ctor_args: ctor_args.iter().map(|a| a.to_string()).collect(),
            fields,
            info: vec![],
        }
    }

    #[test]
    fn test_unknown_ctor_arg() {
        let mut module = Module::new("app/users");
        module.commands.push(command(vec![field("Name")], &["Id"]));
        let err = validate_structure(&module).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownCtorArg { ref arg, .. } if arg == "Id"));
    }

    #[test]
    fn test_duplicate_field_key() {
        let mut module = Module::new("app/users");
        module.commands.push(command(vec![field("Name"), field("Name")], &[]));
        let err = validate_structure(&module).unwrap_err();
        assert!(matches!(err, CodegenError::Duplicate { what: "field", .. }));
    }

    #[test]
    fn test_duplicate_enum_members_and_keys() {
        let mut module = Module::new("app/users");
        module.types.enums.push(EnumDef {
            name: "Status".to_string(),
            members: vec!["active".to_string(), "active".to_string()],
        });
        let err = validate_structure(&module).unwrap_err();
        assert!(matches!(err, CodegenError::Duplicate { what: "enum member", .. }));

        module.types.enums[0].members = vec!["in_progress".to_string(), "inProgress".to_string()];
        let err = validate_structure(&module).unwrap_err();
        assert!(matches!(err, CodegenError::Duplicate { what: "enum member key", .. }));
    }

    #[test]
    fn test_query_key_collides_with_placeholder() {
        let mut module = Module::new("app/users");
        module.ui_routes.push(UiRouteSpec {
            id: "user".to_string(),
            path: parse_path_template("/users/{id}").unwrap(),
            query: vec![QueryParamSpec {
                key: "id".to_string(),
                param_type: QueryParamType::String,
                nullable: true,
            }],
        });
        let err = validate_structure(&module).unwrap_err();
        assert!(matches!(err, CodegenError::Duplicate { what: "query parameter", .. }));
    }

    #[test]
    fn test_field_shadowing_generated_method() {
        let mut module = Module::new("app/users");
        module.commands.push(command(vec![field("Name"), field("validate")], &[]));
        let err = validate_structure(&module).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::ReservedName { ref name, method: "Validate", .. } if name == "validate"
        ));

        let mut module = Module::new("app/users");
        module.events.push(EventDef {
            event: "user.Created".to_string(),
            fields: vec![EventField {
                key: "meta".to_string(),
                datatype: DatatypeDef::primitive(Primitive::String),
                notes: String::new(),
            }],
            changelog: vec![],
        });
        let err = validate_structure(&module).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::SpecValidation);
        assert!(matches!(err, CodegenError::ReservedName { method: "Meta", .. }));

        // only the exact method name is reserved
        module.events[0].fields[0].key = "metadata".to_string();
        assert!(validate_structure(&module).is_ok());
    }

    #[test]
    fn test_duplicate_module_ids() {
        let modules = vec![
            Module::new("server/users"),
            Module::new("server/accounts"),
            Module::new("client/users"),
        ];
        let err = validate_module_ids(&modules).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Duplicate { what: "module id", ref location, .. }
                if location == "modules 'server/users' and 'client/users'"
        ));

        assert!(validate_module_ids(&modules[..2]).is_ok());
    }

    #[test]
    fn test_valid_module() {
        let mut module = Module::new("app/users");
        module.commands.push(command(vec![field("Id"), field("Name")], &["Id"]));
        assert!(validate_structure(&module).is_ok());
    }
}
