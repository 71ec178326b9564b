//! Reference and type-mapping validation.
//!
//! Every custom reference must resolve, and every command must compile: field
//! tags map on both sides, regexes compile and every field has a UI kind.

use crate::codegen::commands::{describe_field, CompiledCommand};
use crate::diagnostic::CodegenError;
use crate::ir::{DatatypeDef, Module, ModuleRegistry};

fn check_datatype(
    module: &Module,
    registry: &[Module],
    location: &str,
    root: &DatatypeDef,
) -> Result<(), CodegenError> {
    for type_ref in root.flatten().into_iter().filter_map(DatatypeDef::as_reference) {
        let resolved = match type_ref.module {
            None => module.resolve_local(&type_ref.name),
            Some(_) => registry.resolve(type_ref),
        };
        if resolved.is_none() {
            return Err(CodegenError::UnresolvedReference {
                module: module.id.clone(),
                location: location.to_string(),
                name: type_ref.qualified(),
            });
        }
    }
    Ok(())
}

/// Validates references of every datatype in the module.
pub fn validate_references(module: &Module, registry: &[Module]) -> Result<(), CodegenError> {
    for named in &module.types.types {
        check_datatype(module, registry, &format!("type '{}'", named.name), &named.datatype)?;
    }

    for endpoint in &module.types.endpoints {
        let location = format!("endpoint '{}'", endpoint.name);
        for root in endpoint.consumes.iter().chain(endpoint.produces.iter()) {
            check_datatype(module, registry, &location, root)?;
        }
    }

    for event in &module.events {
        for field in &event.fields {
            let location = format!("event '{}' field '{}'", event.event, field.key);
            check_datatype(module, registry, &location, &field.datatype)?;
        }
    }

    Ok(())
}

/// Compiles every command once so that mapping failures surface before rendering.
pub fn validate_commands(module: &Module) -> Result<(), CodegenError> {
    for command in &module.commands {
        CompiledCommand::compile(&module.id, command)?;
        for field in &command.fields {
            describe_field(&module.id, command, field)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ErrorCategory;
    use crate::ir::{
        CommandFieldSpec, CommandSpec, CrudNature, EnumDef, EventDef, EventField, FieldType,
        NamedType, Primitive, TypeRef,
    };

    fn reference(raw: &str) -> DatatypeDef {
        DatatypeDef::reference(TypeRef::parse(raw).unwrap())
    }

    #[test]
    fn test_unresolved_local_reference() {
        let mut module = Module::new("app/users");
        module.types.types.push(NamedType {
            name: "Team".to_string(),
            datatype: DatatypeDef::array(reference("Person")),
        });

        let registry = vec![module.clone()];
        let err = validate_references(&module, &registry).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::SpecValidation);
        assert!(matches!(err, CodegenError::UnresolvedReference { ref name, .. } if name == "Person"));
    }

    #[test]
    fn test_cross_module_reference() {
        let mut accounts = Module::new("app/accounts");
        accounts.types.enums.push(EnumDef {
            name: "Plan".to_string(),
            members: vec!["free".to_string()],
        });

        let mut users = Module::new("app/users");
        users.events.push(EventDef {
            event: "user.Created".to_string(),
            fields: vec![EventField {
                key: "plan".to_string(),
                datatype: reference("accounts.Plan"),
                notes: String::new(),
            }],
            changelog: vec![],
        });

        let registry = vec![accounts, users.clone()];
        assert!(validate_references(&users, &registry).is_ok());

        let alone = vec![users.clone()];
        assert!(validate_references(&users, &alone).is_err());
    }

    #[test]
    fn test_datetime_command_field_is_rejected() {
        let mut module = Module::new("app/users");
        module.commands.push(CommandSpec {
            command: "meeting.schedule".to_string(),
            title: "Schedule".to_string(),
            crud_nature: CrudNature::Create,
            additional_confirmation: None,
            middleware_chain: "authenticated".to_string(),
            ctor_args: vec![],
            fields: vec![CommandFieldSpec {
                key: "At".to_string(),
                title: "At".to_string(),
                field_type: FieldType::DateTime,
                unit: None,
                validation_regex: None,
                max_length: None,
                optional: false,
                hide_if_default_value: false,
                help: String::new(),
                placeholder: String::new(),
            }],
            info: vec![],
        });

        let err = validate_commands(&module).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::SpecValidation);
    }

    #[test]
    fn test_invalid_regex() {
        let mut module = Module::new("app/users");
        module.commands.push(CommandSpec {
            command: "user.rename".to_string(),
            title: "Rename".to_string(),
            crud_nature: CrudNature::Update,
            additional_confirmation: None,
            middleware_chain: "authenticated".to_string(),
            ctor_args: vec![],
            fields: vec![CommandFieldSpec {
                key: "Name".to_string(),
                title: "Name".to_string(),
                field_type: FieldType::Text,
                unit: None,
                validation_regex: Some("^[a-z".to_string()),
                max_length: None,
                optional: false,
                hide_if_default_value: false,
                help: String::new(),
                placeholder: String::new(),
            }],
            info: vec![],
        });

        let err = validate_commands(&module).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidRegex { .. }));
    }

    #[test]
    fn test_primitives_need_no_resolution() {
        let mut module = Module::new("app/users");
        module.types.types.push(NamedType {
            name: "Stamp".to_string(),
            datatype: DatatypeDef::primitive(Primitive::DateTime),
        });
        assert!(validate_references(&module, &[]).is_ok());
    }
}
