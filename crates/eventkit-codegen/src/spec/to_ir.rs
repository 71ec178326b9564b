//! Lowering of decoded spec documents into the IR.
//!
//! Every type name is classified here, once. Command field tags naming a custom
//! type are resolved to an enum or a struct against the declarations of every
//! module of the run.

use std::path::Path;

use crate::codegen::routes::parse_path_template;
use crate::diagnostic::CodegenError;
use crate::ir::{
    CommandFieldSpec, CommandSpec, CrudNature, CustomType, DatatypeDef, EndpointSpec, EnumDef,
    EventDef, EventField, FieldType, HttpMethod, Module, ModuleRegistry, NamedType, PathTemplate,
    Primitive, QueryParamSpec, QueryParamType, ReferenceTarget, StringConst, TypeKind, TypeRef,
    TypesFile, UiRouteSpec,
};

use super::document::{
    CommandDoc, CommandFieldDoc, DatatypeDoc, EventsDocument, QueryParamDoc, TypesDocument,
    UiRouteDoc,
};

/// Where a document came from, for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub module: &'a str,
    pub path: &'a Path,
}

impl Source<'_> {
    fn decode_failed(&self, message: String) -> CodegenError {
        CodegenError::DecodeFailed {
            module: self.module.to_string(),
            path: self.path.to_path_buf(),
            message,
        }
    }

    fn invalid_path(&self, location: String, path: &str, message: String) -> CodegenError {
        CodegenError::InvalidPath {
            module: self.module.to_string(),
            location,
            path: path.to_string(),
            message,
        }
    }
}

// =============================================================================
// Datatypes
// =============================================================================

/// Lowers a datatype, classifying every name it contains.
pub fn lower_datatype(
    module: &str,
    location: &str,
    doc: &DatatypeDoc,
) -> Result<DatatypeDef, CodegenError> {
    let (name, nullable, of, fields) = match doc {
        DatatypeDoc::Name(name) => (name.as_str(), false, None, None),
        DatatypeDoc::Node(node) => (
            node.name.as_str(),
            node.nullable,
            node.of.as_deref(),
            node.fields.as_ref(),
        ),
    };

    let kind = TypeKind::classify(name).ok_or_else(|| CodegenError::UnknownType {
        module: module.to_string(),
        location: location.to_string(),
        name: name.to_string(),
    })?;

    let def = match kind {
        TypeKind::CustomReference(type_ref) => DatatypeDef::reference(type_ref),
        TypeKind::Primitive(Primitive::Array) => match of {
            Some(of) => DatatypeDef::array(lower_datatype(module, location, of)?),
            None => DatatypeDef::primitive(Primitive::Array),
        },
        TypeKind::Primitive(Primitive::Object) => {
            let lowered = fields
                .map(|fields| {
                    fields
                        .0
                        .iter()
                        .map(|(key, field)| {
                            let location = format!("{}.{}", location, key);
                            Ok((key.clone(), lower_datatype(module, &location, field)?))
                        })
                        .collect::<Result<Vec<_>, CodegenError>>()
                })
                .transpose()?
                .unwrap_or_default();
            DatatypeDef::object(lowered)
        }
        TypeKind::Primitive(primitive) => DatatypeDef::primitive(primitive),
    };

    Ok(def.with_nullable(nullable))
}

// =============================================================================
// Types
// =============================================================================

pub fn lower_types(source: Source<'_>, doc: &TypesDocument) -> Result<TypesFile, CodegenError> {
    let module = source.module;

    let types = doc
        .types
        .iter()
        .map(|t| {
            Ok(NamedType {
                name: t.name.clone(),
                datatype: lower_datatype(module, &format!("type '{}'", t.name), &t.datatype)?,
            })
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;

    let enums = doc
        .enums
        .iter()
        .map(|e| EnumDef {
            name: e.name.clone(),
            members: e.members.clone(),
        })
        .collect();

    let string_consts = doc
        .string_consts
        .iter()
        .map(|c| StringConst {
            key: c.key.clone(),
            value: c.value.clone(),
        })
        .collect();

    let endpoints = doc
        .endpoints
        .iter()
        .map(|e| {
            let location = format!("endpoint '{}'", e.name);
            let method = HttpMethod::parse(&e.method).ok_or_else(|| {
                source.decode_failed(format!("{}: unknown HTTP method '{}'", location, e.method))
            })?;
            let path = parse_path_template(&e.path)
                .map_err(|err| source.invalid_path(location.clone(), &e.path, err.to_string()))?;
            let lower_optional = |doc: &Option<DatatypeDoc>, what: &str| {
                doc.as_ref()
                    .map(|d| lower_datatype(module, &format!("{} {}", location, what), d))
                    .transpose()
            };

            Ok(EndpointSpec {
                name: e.name.clone(),
                method,
                path,
                middleware_chain: e.chain.clone(),
                consumes: lower_optional(&e.consumes, "consumes")?,
                produces: lower_optional(&e.produces, "produces")?,
                description: e.description.clone(),
            })
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;

    Ok(TypesFile {
        types,
        enums,
        string_consts,
        endpoints,
    })
}

// =============================================================================
// Events
// =============================================================================

pub fn lower_events(module: &str, doc: &EventsDocument) -> Result<Vec<EventDef>, CodegenError> {
    doc.events
        .iter()
        .map(|e| {
            let fields = e
                .fields
                .iter()
                .map(|f| {
                    let location = format!("event '{}' field '{}'", e.event, f.key);
                    Ok(EventField {
                        key: f.key.clone(),
                        datatype: lower_datatype(module, &location, &f.datatype)?,
                        notes: f.notes.clone(),
                    })
                })
                .collect::<Result<Vec<_>, CodegenError>>()?;

            Ok(EventDef {
                event: e.event.clone(),
                fields,
                changelog: e.changelog.clone(),
            })
        })
        .collect()
}

// =============================================================================
// UI routes
// =============================================================================

fn lower_query_param(source: Source<'_>, route_id: &str, doc: &QueryParamDoc) -> Result<QueryParamSpec, CodegenError> {
    let param_type = QueryParamType::parse(&doc.param_type).ok_or_else(|| {
        source.decode_failed(format!(
            "route '{}' query parameter '{}': unknown type '{}'",
            route_id, doc.key, doc.param_type
        ))
    })?;

    Ok(QueryParamSpec {
        key: doc.key.clone(),
        param_type,
        nullable: doc.nullable,
    })
}

/// Lowers UI routes. Query placeholders written in the path (`?q={q}`) become
/// required string parameters ahead of the declared ones.
pub fn lower_ui_routes(source: Source<'_>, docs: &[UiRouteDoc]) -> Result<Vec<UiRouteSpec>, CodegenError> {
    docs.iter()
        .map(|doc| {
            let location = format!("route '{}'", doc.id);
            let parsed = parse_path_template(&doc.path)
                .map_err(|err| source.invalid_path(location, &doc.path, err.to_string()))?;

            let mut query: Vec<QueryParamSpec> = parsed
                .query_placeholders
                .iter()
                .map(|(key, _)| QueryParamSpec {
                    key: key.clone(),
                    param_type: QueryParamType::String,
                    nullable: false,
                })
                .collect();
            for param in &doc.query {
                query.push(lower_query_param(source, &doc.id, param)?);
            }

            Ok(UiRouteSpec {
                id: doc.id.clone(),
                path: PathTemplate {
                    query_placeholders: Vec::new(),
                    ..parsed
                },
                query,
            })
        })
        .collect()
}

// =============================================================================
// Commands
// =============================================================================

fn resolve_reference(
    module: &Module,
    registry: &[Module],
    type_ref: &TypeRef,
) -> Option<ReferenceTarget> {
    match type_ref.module {
        None => module.resolve_local(&type_ref.name),
        Some(_) => registry.resolve(type_ref),
    }
}

fn lower_field_type(
    module: &Module,
    registry: &[Module],
    command: &str,
    doc: &CommandFieldDoc,
) -> Result<FieldType, CodegenError> {
    if let Some(builtin) = FieldType::from_builtin_tag(&doc.type_tag) {
        return Ok(builtin);
    }

    let type_ref = TypeRef::parse(&doc.type_tag).ok_or_else(|| CodegenError::UnmappedFieldType {
        module: module.id.clone(),
        command: command.to_string(),
        field: doc.key.clone(),
        type_tag: doc.type_tag.clone(),
    })?;

    match resolve_reference(module, registry, &type_ref) {
        Some(ReferenceTarget::Enum) => Ok(FieldType::Custom(CustomType::Enum(type_ref))),
        Some(ReferenceTarget::Struct) => Ok(FieldType::Custom(CustomType::Struct(type_ref))),
        None => Err(CodegenError::UnresolvedReference {
            module: module.id.clone(),
            location: format!("command '{}' field '{}'", command, doc.key),
            name: doc.type_tag.clone(),
        }),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Lowers commands. `module` must already carry its type declarations.
pub fn lower_commands(
    source: Source<'_>,
    module: &Module,
    registry: &[Module],
    docs: &[CommandDoc],
) -> Result<Vec<CommandSpec>, CodegenError> {
    docs.iter()
        .map(|doc| {
            let crud_nature = CrudNature::parse(&doc.crud_nature).ok_or_else(|| {
                source.decode_failed(format!(
                    "command '{}': unknown crudNature '{}'",
                    doc.command, doc.crud_nature
                ))
            })?;

            let fields = doc
                .fields
                .iter()
                .map(|f| {
                    Ok(CommandFieldSpec {
                        key: f.key.clone(),
                        title: f.title.clone(),
                        field_type: lower_field_type(module, registry, &doc.command, f)?,
                        unit: non_empty(&f.unit),
                        validation_regex: non_empty(&f.validation_regex),
                        max_length: f.max_length,
                        optional: f.optional,
                        hide_if_default_value: f.hide_if_default_value,
                        help: f.help.clone(),
                        placeholder: f.placeholder.clone(),
                    })
                })
                .collect::<Result<Vec<_>, CodegenError>>()?;

            Ok(CommandSpec {
                command: doc.command.clone(),
                title: doc.title.clone(),
                crud_nature,
                additional_confirmation: non_empty(&doc.additional_confirmation),
                middleware_chain: doc.chain.clone(),
                ctor_args: doc.ctor.clone(),
                fields,
                info: doc.info.clone(),
            })
        })
        .collect()
}
