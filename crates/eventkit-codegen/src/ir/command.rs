//! Command IR.

use super::TypeRef;

/// The CRUD nature of a command, used by the frontend to style buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudNature {
    Create,
    Update,
    Delete,
}

impl CrudNature {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// The value representation of a custom-typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomType {
    /// `custom/string`: a custom widget producing a string.
    String,
    /// `custom/integer`: a custom widget producing an integer.
    Integer,
    /// A reference resolved to a declared enum.
    Enum(TypeRef),
    /// A reference resolved to a declared struct.
    Struct(TypeRef),
}

/// A command field's declared type, after lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Multiline,
    Password,
    Checkbox,
    Integer,
    Date,
    DateTime,
    Custom(CustomType),
}

impl FieldType {
    /// Parses a builtin tag. Custom references are resolved by the loader.
    pub fn from_builtin_tag(tag: &str) -> Option<Self> {
        match tag {
            "" | "text" => Some(Self::Text),
            "multiline" => Some(Self::Multiline),
            "password" => Some(Self::Password),
            "checkbox" => Some(Self::Checkbox),
            "integer" => Some(Self::Integer),
            "date" => Some(Self::Date),
            "datetime" => Some(Self::DateTime),
            "custom/string" => Some(Self::Custom(CustomType::String)),
            "custom/integer" => Some(Self::Custom(CustomType::Integer)),
            _ => None,
        }
    }

    /// The tag as written in specs and docs.
    pub fn tag(&self) -> String {
        match self {
            Self::Text => "text".to_string(),
            Self::Multiline => "multiline".to_string(),
            Self::Password => "password".to_string(),
            Self::Checkbox => "checkbox".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Date => "date".to_string(),
            Self::DateTime => "datetime".to_string(),
            Self::Custom(CustomType::String) => "custom/string".to_string(),
            Self::Custom(CustomType::Integer) => "custom/integer".to_string(),
            Self::Custom(CustomType::Enum(r) | CustomType::Struct(r)) => r.qualified(),
        }
    }

    /// Single-line text input (text or password).
    pub fn is_single_line_text(&self) -> bool {
        matches!(self, Self::Text | Self::Password)
    }
}

/// A command field.
#[derive(Debug, Clone)]
pub struct CommandFieldSpec {
    pub key: String,
    pub title: String,
    pub field_type: FieldType,
    pub unit: Option<String>,
    pub validation_regex: Option<String>,
    pub max_length: Option<usize>,
    pub optional: bool,
    pub hide_if_default_value: bool,
    pub help: String,
    pub placeholder: String,
}

/// A command declaration.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Dotted key, e.g. `user.create`.
    pub command: String,
    pub title: String,
    pub crud_nature: CrudNature,
    pub additional_confirmation: Option<String>,
    pub middleware_chain: String,
    pub ctor_args: Vec<String>,
    pub fields: Vec<CommandFieldSpec>,
    pub info: Vec<String>,
}

impl CommandSpec {
    pub fn field(&self, key: &str) -> Option<&CommandFieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn is_ctor_arg(&self, key: &str) -> bool {
        self.ctor_args.iter().any(|arg| arg == key)
    }
}
