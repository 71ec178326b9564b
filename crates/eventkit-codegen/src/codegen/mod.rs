//! Go and TypeScript code generation from the module IR.
//!
//! For every module a single immutable [`ModuleContext`] is built up front
//! (type mapping, enum processing, command and route compilation). Each output
//! file is then a pure render of one template against that context.

pub mod commands;
pub mod enums;
pub mod events;
pub mod render;
pub mod routes;
pub mod templates;
pub mod type_mapper;

use std::collections::BTreeSet;
use std::path::PathBuf;

use convert_case::{Case, Casing};
use serde::Serialize;
use tracing::trace;

use crate::config::CodegenConfig;
use crate::diagnostic::CodegenError;
use crate::ir::{
    flatten_all, unique_module_ids, DatatypeDef, Module, ModuleRegistry, PrimitiveFlags,
};
use commands::{commands_context, CommandContext, CommandImports};
use enums::ProcessedEnum;
use events::{events_context, EventContext};
use render::Renderer;
use routes::{endpoint_context, ui_route_context, EndpointContext, UiRouteContext};
use type_mapper::{go_type_declaration, ts_type_declaration, TypeExpressions};

// =============================================================================
// Naming and quoting
// =============================================================================

/// `"getUser"` => `"GetUser"`
pub fn uppercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// `"UserCreate"` => `"userCreate"`
pub fn lowercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// `"user.create"` => `"UserCreate"`, `"user.Created"` => `"UserCreated"`
pub fn struct_name_from_key(key: &str) -> String {
    key.split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_case(Case::Pascal))
        .collect()
}

/// `"/search?q={q}"` => `"/search"`
pub fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(path, _)| path)
}

/// Single-quoted JavaScript string literal.
pub fn js_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Double-quoted Go string literal.
pub fn go_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

// =============================================================================
// Imports
// =============================================================================

/// Import requirements derived from a set of flattened datatypes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatatypeImports {
    pub flags: PrimitiveFlags,
    /// Other modules referenced, sorted.
    pub module_ids: Vec<String>,
    /// Unqualified references, sorted.
    pub local_types: Vec<String>,
}

impl DatatypeImports {
    pub fn from_types(types: &[&DatatypeDef]) -> Self {
        let local_types: BTreeSet<String> = types
            .iter()
            .filter_map(|typ| typ.as_reference())
            .filter(|type_ref| type_ref.module.is_none())
            .map(|type_ref| type_ref.name.clone())
            .collect();

        Self {
            flags: PrimitiveFlags::from_types(types),
            module_ids: unique_module_ids(types),
            local_types: local_types.into_iter().collect(),
        }
    }
}

/// Another module of the run, as imported from generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleImport {
    pub id: String,
    pub go_path: String,
    pub ts_path: String,
}

fn module_imports(ids: &[String], registry: &[Module], config: &CodegenConfig) -> Vec<ModuleImport> {
    ids.iter()
        .filter_map(|id| {
            let path = registry.module_path(id)?;
            Some(ModuleImport {
                id: id.clone(),
                go_path: format!("{}{}", config.backend_module_prefix, path),
                ts_path: format!("{}{}_types", config.frontend_module_prefix, path),
            })
        })
        .collect()
}

// =============================================================================
// Rendering context
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptsContext {
    pub backend_module_prefix: String,
    pub frontend_module_prefix: String,
    pub backend_runtime_package: String,
    pub frontend_runtime_package: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub go: String,
    pub ts: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StringConstContext {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypesSection {
    pub imports: DatatypeImports,
    pub modules: Vec<ModuleImport>,
    pub enums: Vec<ProcessedEnum>,
    pub declarations: Vec<TypeDeclaration>,
    pub string_consts: Vec<StringConstContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsSection {
    pub imports: DatatypeImports,
    pub modules: Vec<ModuleImport>,
    pub events: Vec<EventContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandsSection {
    pub imports: CommandImports,
    pub go_modules: Vec<ModuleImport>,
    pub ts_modules: Vec<ModuleImport>,
    pub commands: Vec<CommandContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointsSection {
    pub imports: DatatypeImports,
    pub modules: Vec<ModuleImport>,
    /// Some endpoint URL has placeholders, so `net/url` is needed.
    pub uses_url_escape: bool,
    pub endpoints: Vec<EndpointContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiRoutesSection {
    pub routes: Vec<UiRouteContext>,
    /// TypeScript union of every route, `never` when there are none.
    pub route_union: String,
}

/// Everything the templates of one module render from.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleContext {
    pub module: ModuleInfo,
    pub opts: OptsContext,
    pub types: TypesSection,
    pub events: EventsSection,
    pub commands: CommandsSection,
    pub endpoints: EndpointsSection,
    pub ui_routes: UiRoutesSection,
}

fn types_section(module: &Module, registry: &[Module], config: &CodegenConfig) -> TypesSection {
    let types = &module.types;
    let imports =
        DatatypeImports::from_types(&flatten_all(types.types.iter().map(|t| &t.datatype)));

    TypesSection {
        modules: module_imports(&imports.module_ids, registry, config),
        imports,
        enums: types.enums.iter().map(ProcessedEnum::process).collect(),
        declarations: types
            .types
            .iter()
            .map(|named| TypeDeclaration {
                name: named.name.clone(),
                go: go_type_declaration(named),
                ts: ts_type_declaration(named),
            })
            .collect(),
        string_consts: types
            .string_consts
            .iter()
            .map(|c| StringConstContext {
                key: c.key.clone(),
                value: c.value.clone(),
            })
            .collect(),
    }
}

fn endpoints_section(
    module: &Module,
    registry: &[Module],
    config: &CodegenConfig,
) -> EndpointsSection {
    let endpoints = &module.types.endpoints;
    let roots = endpoints
        .iter()
        .flat_map(|e| e.consumes.iter().chain(e.produces.iter()));
    let imports = DatatypeImports::from_types(&flatten_all(roots));

    EndpointsSection {
        modules: module_imports(&imports.module_ids, registry, config),
        imports,
        uses_url_escape: endpoints.iter().any(|e| {
            !e.path.path_placeholders.is_empty() || !e.path.query_placeholders.is_empty()
        }),
        endpoints: endpoints
            .iter()
            .map(|e| {
                endpoint_context(
                    e,
                    e.consumes.as_ref().map(TypeExpressions::of_datatype),
                    e.produces.as_ref().map(TypeExpressions::of_datatype),
                )
            })
            .collect(),
    }
}

fn ui_routes_section(module: &Module) -> UiRoutesSection {
    let routes: Vec<UiRouteContext> = module.ui_routes.iter().map(ui_route_context).collect();

    let members: Vec<String> = routes
        .iter()
        .map(|r| {
            if r.has_opts {
                format!("{{ id: {}; opts: {} }}", js_string_literal(&r.id), r.opts_name)
            } else {
                format!("{{ id: {} }}", js_string_literal(&r.id))
            }
        })
        .collect();

    let route_union = if members.is_empty() {
        "never".to_string()
    } else {
        members.join(" | ")
    };

    UiRoutesSection {
        routes,
        route_union,
    }
}

/// Builds the rendering context of a module.
pub fn build_context(
    module: &Module,
    registry: &[Module],
    config: &CodegenConfig,
) -> Result<ModuleContext, CodegenError> {
    let (events, events_imports) = events_context(module);
    let (commands, commands_imports) = commands_context(module)?;

    Ok(ModuleContext {
        module: ModuleInfo {
            id: module.id.clone(),
            path: module.path.clone(),
        },
        opts: OptsContext {
            backend_module_prefix: config.backend_module_prefix.clone(),
            frontend_module_prefix: config.frontend_module_prefix.clone(),
            backend_runtime_package: config.backend_runtime_package.clone(),
            frontend_runtime_package: config.frontend_runtime_package.clone(),
        },
        types: types_section(module, registry, config),
        events: EventsSection {
            modules: module_imports(&events_imports.module_ids, registry, config),
            imports: events_imports,
            events,
        },
        commands: CommandsSection {
            go_modules: module_imports(&commands_imports.go_module_ids, registry, config),
            ts_modules: module_imports(&commands_imports.ts_module_ids, registry, config),
            imports: commands_imports,
            commands,
        },
        endpoints: endpoints_section(module, registry, config),
        ui_routes: ui_routes_section(module),
    })
}

// =============================================================================
// Output files
// =============================================================================

/// Output language of a generated file; decides the marker comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Go,
    TypeScript,
    Markdown,
}

impl OutputKind {
    /// First line of every generated file.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Go => "// Code generated by eventkit-codegen. DO NOT EDIT.\n\n",
            Self::TypeScript => "// WARNING: generated file, do not edit\n",
            Self::Markdown => "<!-- generated file, do not edit -->\n\n",
        }
    }
}

/// A rendered file, relative to the output root.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Every file generated for one module.
#[derive(Debug, Clone, Default)]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    fn render(
        &mut self,
        renderer: &Renderer,
        context: &ModuleContext,
        path: String,
        kind: OutputKind,
        source: &str,
    ) -> Result<(), CodegenError> {
        let body = renderer.render(&path, source, context)?;
        trace!(path = %path, bytes = body.len(), "rendered");
        self.files.push(GeneratedFile {
            path: PathBuf::from(path),
            content: format!("{}{}", kind.marker(), body),
        });
        Ok(())
    }
}

/// Renders every output file of a module into memory.
pub fn generate(
    module: &Module,
    registry: &[Module],
    config: &CodegenConfig,
    renderer: &Renderer,
) -> Result<GeneratedCode, CodegenError> {
    use templates::{backend, docs, frontend};
    use OutputKind::{Go, Markdown, TypeScript};

    let context = build_context(module, registry, config)?;
    let path = &module.path;
    let docs_enabled = config.autogenerate_module_docs;
    let mut out = GeneratedCode::default();

    if module.present.commands {
        out.render(renderer, &context, format!("backend/{}/commands.gen.go", path), Go, backend::COMMANDS)?;
        out.render(renderer, &context, format!("frontend/{}_commands.ts", path), TypeScript, frontend::COMMANDS)?;
        if docs_enabled {
            out.render(renderer, &context, format!("docs/{}/commands.md", path), Markdown, docs::COMMANDS)?;
        }
    }

    if module.present.events {
        out.render(renderer, &context, format!("backend/{}/events.gen.go", path), Go, backend::EVENTS)?;
        if docs_enabled {
            out.render(renderer, &context, format!("docs/{}/events.md", path), Markdown, docs::EVENTS)?;
        }
    }

    if module.has_rest_endpoints() {
        out.render(renderer, &context, format!("backend/{}/restendpoints.gen.go", path), Go, backend::REST_ENDPOINTS)?;
        out.render(renderer, &context, format!("frontend/{}_endpoints.ts", path), TypeScript, frontend::REST_ENDPOINTS)?;
        if docs_enabled {
            out.render(renderer, &context, format!("docs/{}/rest_endpoints.md", path), Markdown, docs::REST_ENDPOINTS)?;
        }
    }

    if module.present.types {
        out.render(renderer, &context, format!("backend/{}/types.gen.go", path), Go, backend::TYPES)?;
        out.render(renderer, &context, format!("frontend/{}_types.ts", path), TypeScript, frontend::TYPES)?;
        if docs_enabled {
            out.render(renderer, &context, format!("docs/{}/types.md", path), Markdown, docs::TYPES)?;
        }
    }

    if module.present.ui_routes {
        out.render(renderer, &context, format!("backend/{}/uiroutes.gen.go", path), Go, backend::UI_ROUTES)?;
        out.render(renderer, &context, format!("frontend/{}_uiroutes.ts", path), TypeScript, frontend::UI_ROUTES)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        CommandFieldSpec, CommandSpec, CrudNature, EnumDef, FieldType, NamedType, Primitive,
        TypeRef,
    };

    #[test]
    fn test_naming() {
        assert_eq!(uppercase_first("getUser"), "GetUser");
        assert_eq!(uppercase_first(""), "");
        assert_eq!(lowercase_first("UserCreate"), "userCreate");
        assert_eq!(struct_name_from_key("user.create"), "UserCreate");
        assert_eq!(struct_name_from_key("user.Created"), "UserCreated");
        assert_eq!(struct_name_from_key("user.change_password"), "UserChangePassword");
        assert_eq!(strip_query("/search?q={q}"), "/search");
        assert_eq!(strip_query("/search"), "/search");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(js_string_literal("it's\n"), r"'it\'s\n'");
        assert_eq!(go_string_literal(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }

    #[test]
    fn test_datatype_imports() {
        let root = DatatypeDef::object(vec![
            ("a".to_string(), DatatypeDef::reference(TypeRef::parse("Person").unwrap())),
            ("b".to_string(), DatatypeDef::reference(TypeRef::parse("billing.Plan").unwrap())),
            ("c".to_string(), DatatypeDef::primitive(Primitive::Date)),
        ]);
        let imports = DatatypeImports::from_types(&root.flatten());
        assert_eq!(imports.local_types, vec!["Person"]);
        assert_eq!(imports.module_ids, vec!["billing"]);
        assert!(imports.flags.date);
    }

    fn sample_module() -> Module {
        let mut module = Module::new("app/users");
        module.present.types = true;
        module.present.commands = true;
        module.types.enums.push(EnumDef {
            name: "Role".to_string(),
            members: vec!["admin".to_string(), "viewer".to_string()],
        });
        module.types.types.push(NamedType {
            name: "Person".to_string(),
            datatype: DatatypeDef::object(vec![(
                "name".to_string(),
                DatatypeDef::primitive(Primitive::String),
            )]),
        });
        module.commands.push(CommandSpec {
            command: "user.create".to_string(),
            title: "Create user".to_string(),
            crud_nature: CrudNature::Create,
            additional_confirmation: None,
            middleware_chain: "authenticated".to_string(),
            ctor_args: vec![],
            fields: vec![CommandFieldSpec {
                key: "Name".to_string(),
                title: "Name".to_string(),
                field_type: FieldType::Text,
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
        module
    }

    #[test]
    fn test_generate_file_set_and_markers() {
        let module = sample_module();
        let registry = vec![module.clone()];
        let config = CodegenConfig::default();
        let out = generate(&module, &registry, &config, &Renderer::default()).unwrap();

        let paths: Vec<String> = out
            .files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            paths,
            vec![
                "backend/app/users/commands.gen.go",
                "frontend/app/users_commands.ts",
                "backend/app/users/types.gen.go",
                "frontend/app/users_types.ts",
            ]
        );

        for file in &out.files {
            let first_line = file.content.lines().next().unwrap();
            assert!(
                first_line.contains("generated") || first_line.contains("Code generated"),
                "{}",
                file.path.display()
            );
        }

        let go_types = &out.files[2].content;
        assert!(go_types.contains("package users"));
        assert!(go_types.contains("RoleAdmin Role = \"admin\""));
        assert!(go_types.contains("type Person struct {\n\tName string `json:\"name\"`\n}"));
    }

    #[test]
    fn test_empty_module_generates_nothing() {
        let module = Module::new("app/empty");
        let out = generate(&module, &[], &CodegenConfig::default(), &Renderer::default()).unwrap();
        assert!(out.files.is_empty());
    }
}
