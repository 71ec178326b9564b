//! Command compilation: validation rules, Go validation code and UI field
//! descriptors.
//!
//! The rules computed here are both rendered into the Go `Validate()` methods
//! and evaluated by [`CompiledCommand::validate`], so the two agree.

use std::collections::BTreeSet;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::diagnostic::CodegenError;
use crate::ir::{CommandFieldSpec, CommandSpec, CustomType, FieldType, Module};
use super::type_mapper::{map_field_type, TypeExpressions};
use super::{go_string_literal, js_string_literal, lowercase_first, struct_name_from_key, uppercase_first};

/// Default length limit of single-line text fields.
pub const DEFAULT_MAX_LENGTH: usize = 128;
/// Default length limit of multiline fields.
pub const DEFAULT_MULTILINE_MAX_LENGTH: usize = 4096;

/// One validation step of a field. Rules of a field run in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRule {
    /// Compares against nil for struct references, against "" otherwise.
    NonEmpty { nil_check: bool },
    MaxLength { limit: usize },
    Pattern { regex: String },
    NoControlNewlines,
}

/// The first failed rule of a command payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldValidationError {
    #[error("field {field} cannot be empty")]
    Empty { field: String },
    #[error("field {field} exceeded maximum length {max_length} (got {got})")]
    TooLong {
        field: String,
        max_length: usize,
        got: usize,
    },
    #[error("field {field} does not match pattern {pattern}")]
    PatternMismatch { field: String, pattern: String },
    #[error("single-line field {field} contains newlines")]
    ContainsNewlines { field: String },
}

/// Computes the ordered rules of a field.
pub fn validation_rules(field: &CommandFieldSpec) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    match &field.field_type {
        FieldType::Text | FieldType::Password | FieldType::Multiline => {
            if !field.optional {
                rules.push(ValidationRule::NonEmpty { nil_check: false });
            }

            let default_limit = if field.field_type == FieldType::Multiline {
                DEFAULT_MULTILINE_MAX_LENGTH
            } else {
                DEFAULT_MAX_LENGTH
            };
            rules.push(ValidationRule::MaxLength {
                limit: field.max_length.unwrap_or(default_limit),
            });

            if let Some(regex) = &field.validation_regex {
                rules.push(ValidationRule::Pattern {
                    regex: regex.clone(),
                });
            }

            if field.field_type.is_single_line_text() {
                rules.push(ValidationRule::NoControlNewlines);
            }
        }
        FieldType::Custom(custom) => {
            let presence_checked = !matches!(custom, CustomType::Integer);
            if !field.optional && presence_checked {
                rules.push(ValidationRule::NonEmpty {
                    nil_check: matches!(custom, CustomType::Struct(_)),
                });
            }
        }
        // presence check not possible for these types
        FieldType::Checkbox | FieldType::Integer | FieldType::Date | FieldType::DateTime => {}
    }

    rules
}

/// A field with its rules, compiled pattern and type mapping.
#[derive(Debug, Clone)]
pub struct CompiledField<'a> {
    pub spec: &'a CommandFieldSpec,
    pub rules: Vec<ValidationRule>,
    pub types: TypeExpressions,
    pattern: Option<Regex>,
}

impl CompiledField<'_> {
    /// Go struct field name.
    pub fn go_name(&self) -> String {
        uppercase_first(&self.spec.key)
    }

    fn check(&self, value: Option<&Value>) -> Result<(), FieldValidationError> {
        let field = || self.spec.key.clone();
        let text = value.and_then(Value::as_str).unwrap_or("");

        for rule in &self.rules {
            match rule {
                ValidationRule::NonEmpty { nil_check: true } => {
                    if value.map_or(true, Value::is_null) {
                        return Err(FieldValidationError::Empty { field: field() });
                    }
                }
                ValidationRule::NonEmpty { nil_check: false } => {
                    if text.is_empty() {
                        return Err(FieldValidationError::Empty { field: field() });
                    }
                }
                ValidationRule::MaxLength { limit } => {
                    let got = text.chars().count();
                    if got > *limit {
                        return Err(FieldValidationError::TooLong {
                            field: field(),
                            max_length: *limit,
                            got,
                        });
                    }
                }
                ValidationRule::Pattern { regex } => {
                    let matched = self.pattern.as_ref().map_or(true, |re| re.is_match(text));
                    if !text.is_empty() && !matched {
                        return Err(FieldValidationError::PatternMismatch {
                            field: field(),
                            pattern: regex.clone(),
                        });
                    }
                }
                ValidationRule::NoControlNewlines => {
                    if text.contains(['\r', '\n']) {
                        return Err(FieldValidationError::ContainsNewlines { field: field() });
                    }
                }
            }
        }

        Ok(())
    }
}

/// A command with every field compiled.
#[derive(Debug, Clone)]
pub struct CompiledCommand<'a> {
    pub spec: &'a CommandSpec,
    /// `user.create` => `UserCreate`
    pub struct_name: String,
    pub fields: Vec<CompiledField<'a>>,
}

impl<'a> CompiledCommand<'a> {
    pub fn compile(module: &str, spec: &'a CommandSpec) -> Result<Self, CodegenError> {
        let fields = spec
            .fields
            .iter()
            .map(|field| {
                let pattern = field
                    .validation_regex
                    .as_deref()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|e| CodegenError::InvalidRegex {
                        module: module.to_string(),
                        location: format!("command '{}' field '{}'", spec.command, field.key),
                        message: e.to_string(),
                    })?;

                Ok(CompiledField {
                    spec: field,
                    rules: validation_rules(field),
                    types: map_field_type(module, spec, field)?,
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;

        Ok(Self {
            spec,
            struct_name: struct_name_from_key(&spec.command),
            fields,
        })
    }

    /// Validates a JSON payload the way the generated `Validate()` does: fields in
    /// declaration order, first failure wins. Absent keys count as zero values.
    pub fn validate(&self, payload: &Value) -> Result<(), FieldValidationError> {
        for field in &self.fields {
            field.check(payload.get(&field.spec.key))?;
        }
        Ok(())
    }

    fn regexp_var(&self, field: &CompiledField<'_>) -> String {
        format!("{}{}Regexp", lowercase_first(&self.struct_name), field.go_name())
    }

    /// Body of the generated `Validate()` method, without the final `return nil`.
    pub fn go_validation(&self) -> String {
        let mut snippets = Vec::new();

        for field in &self.fields {
            let key = &field.spec.key;
            let access = format!("x.{}", field.go_name());

            for rule in &field.rules {
                let snippet = match rule {
                    ValidationRule::NonEmpty { nil_check } => format!(
                        "if {} == {} {{\n\t\treturn fieldEmptyValidationError(\"{}\")\n\t}}",
                        access,
                        if *nil_check { "nil" } else { "\"\"" },
                        key
                    ),
                    ValidationRule::MaxLength { limit } => format!(
                        "if utf8.RuneCountInString({a}) > {l} {{\n\t\treturn fieldLengthValidationError(\"{k}\", {l}, utf8.RuneCountInString({a}))\n\t}}",
                        a = access,
                        l = limit,
                        k = key
                    ),
                    ValidationRule::Pattern { regex } => format!(
                        "if {a} != \"\" && !{v}.MatchString({a}) {{\n\t\treturn fieldPatternValidationError(\"{k}\", {p})\n\t}}",
                        a = access,
                        v = self.regexp_var(field),
                        k = key,
                        p = go_string_literal(regex)
                    ),
                    ValidationRule::NoControlNewlines => format!(
                        "if strings.ContainsAny({}, \"\\r\\n\") {{\n\t\treturn noNewlinesValidationError(\"{}\")\n\t}}",
                        access, key
                    ),
                };
                snippets.push(snippet);
            }
        }

        snippets.join("\n\t")
    }
}

/// UI widget kind of a command field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UiKind {
    Text,
    Multiline,
    Password,
    Checkbox,
    Integer,
    Date,
    CustomString,
    CustomNumber,
    Any,
}

/// Which property of the frontend field definition carries the default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefaultValueSlot {
    DefaultValueString,
    DefaultValueBoolean,
    DefaultValueNumber,
}

/// How the frontend renders one command field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiFieldDescriptor {
    pub key: String,
    pub title: String,
    pub kind: UiKind,
    pub required: bool,
    pub hide_if_default_value: bool,
    /// TypeScript expression: the constructor argument, `false` or `undefined`.
    pub default_value: String,
    pub default_value_slot: DefaultValueSlot,
    pub unit: Option<String>,
    pub help: String,
    pub placeholder: String,
    pub validation_regex: Option<String>,
}

/// Computes the UI descriptor of a field. Datetime fields have no widget.
pub fn describe_field(
    module: &str,
    command: &CommandSpec,
    field: &CommandFieldSpec,
) -> Result<UiFieldDescriptor, CodegenError> {
    let kind = match &field.field_type {
        FieldType::Text => UiKind::Text,
        FieldType::Multiline => UiKind::Multiline,
        FieldType::Password => UiKind::Password,
        FieldType::Checkbox => UiKind::Checkbox,
        FieldType::Integer => UiKind::Integer,
        FieldType::Date => UiKind::Date,
        FieldType::Custom(CustomType::String) => UiKind::CustomString,
        FieldType::Custom(CustomType::Integer) => UiKind::CustomNumber,
        // string enums are modeled as text input
        FieldType::Custom(CustomType::Enum(_)) => UiKind::Text,
        FieldType::Custom(CustomType::Struct(_)) => UiKind::Any,
        FieldType::DateTime => {
            return Err(CodegenError::UnmappedUiKind {
                module: module.to_string(),
                command: command.command.clone(),
                field: field.key.clone(),
                type_tag: field.field_type.tag(),
            })
        }
    };

    let default_value_slot = match kind {
        UiKind::Checkbox => DefaultValueSlot::DefaultValueBoolean,
        UiKind::Integer | UiKind::CustomNumber => DefaultValueSlot::DefaultValueNumber,
        _ => DefaultValueSlot::DefaultValueString,
    };

    let default_value = if command.is_ctor_arg(&field.key) {
        field.key.clone()
    } else if kind == UiKind::Checkbox {
        "false".to_string()
    } else {
        "undefined".to_string()
    };

    Ok(UiFieldDescriptor {
        key: field.key.clone(),
        title: field.title.clone(),
        kind,
        required: !field.optional,
        hide_if_default_value: field.hide_if_default_value,
        default_value,
        default_value_slot,
        unit: field.unit.clone(),
        help: field.help.clone(),
        placeholder: field.placeholder.clone(),
        validation_regex: field.validation_regex.clone(),
    })
}

impl UiFieldDescriptor {
    /// The field as a TypeScript object literal.
    pub fn to_typescript(&self) -> String {
        let unit = self
            .unit
            .as_deref()
            .map(js_string_literal)
            .unwrap_or_else(|| "null".to_string());
        let regex = self
            .validation_regex
            .as_deref()
            .map(js_string_literal)
            .unwrap_or_else(|| "null".to_string());

        format!(
            "{{ Key: {}, Title: {}, Required: {}, HideIfDefaultValue: {}, Kind: CommandFieldKind.{:?}, {:?}: {}, Help: {}, Placeholder: {}, Unit: {}, ValidationRegex: {} }},",
            js_string_literal(&self.key),
            js_string_literal(&self.title),
            self.required,
            self.hide_if_default_value,
            self.kind,
            self.default_value_slot,
            self.default_value,
            js_string_literal(&self.help),
            js_string_literal(&self.placeholder),
            unit,
            regex
        )
    }
}

// =============================================================================
// Template contexts
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GoFieldContext {
    pub name: String,
    pub go_type: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegexpContext {
    pub var: String,
    pub pattern: String,
}

/// Everything the command templates need for one command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandContext {
    pub key: String,
    pub struct_name: String,
    pub title: String,
    pub crud_nature: &'static str,
    pub additional_confirmation: Option<String>,
    pub chain: String,
    pub info: Vec<String>,
    pub go_fields: Vec<GoFieldContext>,
    pub go_validation: String,
    pub regexps: Vec<RegexpContext>,
    pub ts_ctor_args: String,
    pub ts_fields: Vec<String>,
    pub doc_fields: Vec<DocFieldContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocFieldContext {
    pub key: String,
    pub type_tag: String,
    pub required: bool,
    pub help: String,
}

/// Import requirements of the generated command files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandImports {
    /// `guts` for date fields.
    pub date: bool,
    pub regexp: bool,
    pub strings: bool,
    pub utf8: bool,
    /// Modules whose types Go struct fields reference.
    pub go_module_ids: Vec<String>,
    /// TS: `dateRFC3339` appears in a constructor signature.
    pub ts_date: bool,
    /// Local types appearing in constructor signatures.
    pub ts_local_types: Vec<String>,
    /// Modules whose types appear in constructor signatures.
    pub ts_module_ids: Vec<String>,
}

/// Compiles every command of a module into template contexts.
pub fn commands_context(
    module: &Module,
) -> Result<(Vec<CommandContext>, CommandImports), CodegenError> {
    let mut contexts = Vec::with_capacity(module.commands.len());
    let mut imports = CommandImports::default();
    let mut go_module_ids = BTreeSet::new();
    let mut ts_local_types = BTreeSet::new();
    let mut ts_module_ids = BTreeSet::new();

    for spec in &module.commands {
        let compiled = CompiledCommand::compile(&module.id, spec)?;

        let mut ts_ctor_args = Vec::new();
        let mut ts_fields = Vec::new();
        let mut regexps = Vec::new();

        for field in &compiled.fields {
            for rule in &field.rules {
                match rule {
                    ValidationRule::MaxLength { .. } => imports.utf8 = true,
                    ValidationRule::NoControlNewlines => imports.strings = true,
                    ValidationRule::Pattern { regex } => {
                        imports.regexp = true;
                        regexps.push(RegexpContext {
                            var: compiled.regexp_var(field),
                            pattern: go_string_literal(regex),
                        });
                    }
                    ValidationRule::NonEmpty { .. } => {}
                }
            }

            let type_ref = match &field.spec.field_type {
                FieldType::Date => {
                    imports.date = true;
                    None
                }
                FieldType::Custom(CustomType::Enum(r) | CustomType::Struct(r)) => Some(r),
                _ => None,
            };
            if let Some(module_id) = type_ref.and_then(|r| r.module.clone()) {
                go_module_ids.insert(module_id);
            }

            if spec.is_ctor_arg(&field.spec.key) {
                match type_ref {
                    Some(r) => match &r.module {
                        Some(module_id) => {
                            ts_module_ids.insert(module_id.clone());
                        }
                        None => {
                            ts_local_types.insert(r.name.clone());
                        }
                    },
                    None if field.spec.field_type == FieldType::Date => imports.ts_date = true,
                    None => {}
                }
            }

            ts_fields.push(describe_field(&module.id, spec, field.spec)?.to_typescript());
        }

        for arg in &spec.ctor_args {
            if let Some(field) = compiled.fields.iter().find(|f| &f.spec.key == arg) {
                ts_ctor_args.push(format!("{}: {}", arg, field.types.ts));
            }
        }

        contexts.push(CommandContext {
            key: spec.command.clone(),
            struct_name: compiled.struct_name.clone(),
            title: spec.title.clone(),
            crud_nature: spec.crud_nature.as_str(),
            additional_confirmation: spec.additional_confirmation.clone(),
            chain: spec.middleware_chain.clone(),
            info: spec.info.clone(),
            go_fields: compiled
                .fields
                .iter()
                .map(|f| GoFieldContext {
                    name: f.go_name(),
                    go_type: f.types.go.clone(),
                    key: f.spec.key.clone(),
                })
                .collect(),
            go_validation: compiled.go_validation(),
            regexps,
            ts_ctor_args: ts_ctor_args.join(", "),
            ts_fields,
            doc_fields: spec
                .fields
                .iter()
                .map(|f| DocFieldContext {
                    key: f.key.clone(),
                    type_tag: f.field_type.tag(),
                    required: !f.optional,
                    help: f.help.clone(),
                })
                .collect(),
        });
    }

    imports.go_module_ids = go_module_ids.into_iter().collect();
    imports.ts_local_types = ts_local_types.into_iter().collect();
    imports.ts_module_ids = ts_module_ids.into_iter().collect();

    Ok((contexts, imports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CrudNature, TypeRef};
    use serde_json::json;

    fn field(key: &str, field_type: FieldType) -> CommandFieldSpec {
        CommandFieldSpec {
            key: key.to_string(),
            title: key.to_string(),
            field_type,
            unit: None,
            validation_regex: None,
            max_length: None,
            optional: false,
            hide_if_default_value: false,
            help: String::new(),
            placeholder: String::new(),
        }
    }

    fn command(fields: Vec<CommandFieldSpec>) -> CommandSpec {
        CommandSpec {
            command: "user.create".to_string(),
            title: "Create user".to_string(),
            crud_nature: CrudNature::Create,
            additional_confirmation: None,
            middleware_chain: "authenticated".to_string(),
            ctor_args: vec![],
            fields,
            info: vec![],
        }
    }

    #[test]
    fn test_rules_for_text_fields() {
        let mut name = field("name", FieldType::Text);
        name.validation_regex = Some("^[a-z]+$".to_string());
        assert_eq!(
            validation_rules(&name),
            vec![
                ValidationRule::NonEmpty { nil_check: false },
                ValidationRule::MaxLength { limit: 128 },
                ValidationRule::Pattern {
                    regex: "^[a-z]+$".to_string()
                },
                ValidationRule::NoControlNewlines,
            ]
        );

        let mut bio = field("bio", FieldType::Multiline);
        bio.optional = true;
        assert_eq!(
            validation_rules(&bio),
            vec![ValidationRule::MaxLength { limit: 4096 }]
        );
    }

    #[test]
    fn test_rules_for_other_fields() {
        assert!(validation_rules(&field("admin", FieldType::Checkbox)).is_empty());
        assert!(validation_rules(&field("age", FieldType::Integer)).is_empty());
        assert!(validation_rules(&field("born", FieldType::Date)).is_empty());
        assert!(validation_rules(&field("n", FieldType::Custom(CustomType::Integer))).is_empty());

        let role = TypeRef::parse("Role").unwrap();
        assert_eq!(
            validation_rules(&field("role", FieldType::Custom(CustomType::Enum(role.clone())))),
            vec![ValidationRule::NonEmpty { nil_check: false }]
        );
        assert_eq!(
            validation_rules(&field("profile", FieldType::Custom(CustomType::Struct(role)))),
            vec![ValidationRule::NonEmpty { nil_check: true }]
        );
    }

    #[test]
    fn test_rules_serialize_with_kind_tag() {
        let value = serde_json::to_value(ValidationRule::MaxLength { limit: 5 }).unwrap();
        assert_eq!(value, json!({"kind": "max_length", "limit": 5}));
    }

    #[test]
    fn test_length_limits() {
        let spec = command(vec![field("name", FieldType::Text)]);
        let compiled = CompiledCommand::compile("users", &spec).unwrap();

        assert!(compiled.validate(&json!({"name": "a".repeat(128)})).is_ok());
        assert_eq!(
            compiled.validate(&json!({"name": "a".repeat(129)})),
            Err(FieldValidationError::TooLong {
                field: "name".to_string(),
                max_length: 128,
                got: 129
            })
        );

        let spec = command(vec![field("bio", FieldType::Multiline)]);
        let compiled = CompiledCommand::compile("users", &spec).unwrap();
        assert!(compiled.validate(&json!({"bio": "a\n".repeat(2048)})).is_ok());
    }

    #[test]
    fn test_empty_fails_before_other_rules() {
        let mut name = field("name", FieldType::Text);
        name.validation_regex = Some("^x".to_string());
        let spec = command(vec![name]);
        let compiled = CompiledCommand::compile("users", &spec).unwrap();

        assert_eq!(
            compiled.validate(&json!({"name": ""})),
            Err(FieldValidationError::Empty {
                field: "name".to_string()
            })
        );
        assert_eq!(
            compiled.validate(&json!({})),
            Err(FieldValidationError::Empty {
                field: "name".to_string()
            })
        );
        assert!(matches!(
            compiled.validate(&json!({"name": "y"})),
            Err(FieldValidationError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_first_failing_field_wins() {
        let spec = command(vec![
            field("first", FieldType::Text),
            field("second", FieldType::Text),
        ]);
        let compiled = CompiledCommand::compile("users", &spec).unwrap();
        assert_eq!(
            compiled.validate(&json!({"first": "a\nb", "second": ""})),
            Err(FieldValidationError::ContainsNewlines {
                field: "first".to_string()
            })
        );
    }

    #[test]
    fn test_struct_reference_nil_check() {
        let profile = TypeRef::parse("Profile").unwrap();
        let spec = command(vec![field(
            "profile",
            FieldType::Custom(CustomType::Struct(profile)),
        )]);
        let compiled = CompiledCommand::compile("users", &spec).unwrap();
        assert!(compiled.validate(&json!({"profile": {}})).is_ok());
        assert!(compiled.validate(&json!({"profile": null})).is_err());
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let mut name = field("name", FieldType::Text);
        name.validation_regex = Some("(".to_string());
        let spec = command(vec![name]);
        let err = CompiledCommand::compile("users", &spec).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidRegex { .. }));
    }

    #[test]
    fn test_go_validation() {
        let spec = command(vec![field("name", FieldType::Text)]);
        let compiled = CompiledCommand::compile("users", &spec).unwrap();
        let code = compiled.go_validation();
        assert!(code.starts_with("if x.Name == \"\" {"));
        assert!(code.contains("utf8.RuneCountInString(x.Name) > 128"));
        assert!(code.contains("strings.ContainsAny(x.Name, \"\\r\\n\")"));
    }

    #[test]
    fn test_describe_field() {
        let mut spec = command(vec![
            field("name", FieldType::Text),
            field("admin", FieldType::Checkbox),
            field("role", FieldType::Custom(CustomType::Enum(TypeRef::parse("Role").unwrap()))),
            field("count", FieldType::Custom(CustomType::Integer)),
        ]);
        spec.ctor_args = vec!["name".to_string()];

        let name = describe_field("users", &spec, &spec.fields[0]).unwrap();
        assert_eq!(name.kind, UiKind::Text);
        assert_eq!(name.default_value, "name");
        assert_eq!(name.default_value_slot, DefaultValueSlot::DefaultValueString);

        let admin = describe_field("users", &spec, &spec.fields[1]).unwrap();
        assert_eq!(admin.default_value, "false");
        assert_eq!(admin.default_value_slot, DefaultValueSlot::DefaultValueBoolean);

        let role = describe_field("users", &spec, &spec.fields[2]).unwrap();
        assert_eq!(role.kind, UiKind::Text);
        assert_eq!(role.default_value, "undefined");

        let count = describe_field("users", &spec, &spec.fields[3]).unwrap();
        assert_eq!(count.kind, UiKind::CustomNumber);
        assert_eq!(count.default_value_slot, DefaultValueSlot::DefaultValueNumber);

        assert_eq!(
            name.to_typescript(),
            "{ Key: 'name', Title: 'name', Required: true, HideIfDefaultValue: false, Kind: CommandFieldKind.Text, DefaultValueString: name, Help: '', Placeholder: '', Unit: null, ValidationRegex: null },"
        );
    }

    #[test]
    fn test_datetime_has_no_ui_kind() {
        let spec = command(vec![field("at", FieldType::DateTime)]);
        let err = describe_field("users", &spec, &spec.fields[0]).unwrap_err();
        assert!(matches!(err, CodegenError::UnmappedUiKind { .. }));
    }

    #[test]
    fn test_commands_context_imports() {
        let mut module = Module::new("app/users");
        let mut spec = command(vec![
            field("name", FieldType::Text),
            field("born", FieldType::Date),
            field(
                "plan",
                FieldType::Custom(CustomType::Enum(TypeRef::parse("billing.Plan").unwrap())),
            ),
            field("role", FieldType::Custom(CustomType::Enum(TypeRef::parse("Role").unwrap()))),
        ]);
        spec.ctor_args = vec!["plan".to_string(), "role".to_string()];
        module.commands.push(spec);

        let (contexts, imports) = commands_context(&module).unwrap();
        assert_eq!(contexts[0].struct_name, "UserCreate");
        assert_eq!(contexts[0].ts_ctor_args, "plan: billing.Plan, role: Role");
        assert!(imports.date && imports.utf8 && imports.strings && !imports.regexp);
        assert!(!imports.ts_date);
        assert_eq!(imports.go_module_ids, vec!["billing"]);
        assert_eq!(imports.ts_module_ids, vec!["billing"]);
        assert_eq!(imports.ts_local_types, vec!["Role"]);
    }
}
