//! Raw spec documents as they appear on disk.
//!
//! Decoding is strict: unknown keys are rejected everywhere and object field
//! names must be unique.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A datatype, written either as a bare name or as a node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DatatypeDoc {
    /// `"string"`, `"Person"`, `"othermodule.Person"`
    Name(String),
    /// `{"_": "array", "of": "string", "nullable": true}`
    Node(DatatypeNodeDoc),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatatypeNodeDoc {
    #[serde(rename = "_")]
    pub name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub of: Option<Box<DatatypeDoc>>,
    #[serde(default)]
    pub fields: Option<OrderedFields>,
}

/// Object fields in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedFields(pub Vec<(String, DatatypeDoc)>);

impl<'de> Deserialize<'de> for OrderedFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = OrderedFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to datatypes")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields: Vec<(String, DatatypeDoc)> = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, DatatypeDoc>()? {
                    if fields.iter().any(|(existing, _)| *existing == key) {
                        return Err(de::Error::custom(format!("duplicate field '{}'", key)));
                    }
                    fields.push((key, value));
                }
                Ok(OrderedFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

// =============================================================================
// Types document
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypesDocument {
    #[serde(default)]
    pub types: Vec<NamedTypeDoc>,
    #[serde(default)]
    pub enums: Vec<EnumDoc>,
    #[serde(default, rename = "stringConsts")]
    pub string_consts: Vec<StringConstDoc>,
    #[serde(default)]
    pub endpoints: Vec<EndpointDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedTypeDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: DatatypeDoc,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDoc {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringConstDoc {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointDoc {
    pub name: String,
    pub method: String,
    pub path: String,
    pub chain: String,
    #[serde(default)]
    pub consumes: Option<DatatypeDoc>,
    #[serde(default)]
    pub produces: Option<DatatypeDoc>,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Events document
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsDocument {
    #[serde(default)]
    pub events: Vec<EventDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDoc {
    pub event: String,
    #[serde(default)]
    pub changelog: Vec<String>,
    #[serde(default)]
    pub fields: Vec<EventFieldDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventFieldDoc {
    pub key: String,
    #[serde(rename = "type")]
    pub datatype: DatatypeDoc,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Commands document
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDoc {
    pub command: String,
    pub title: String,
    #[serde(rename = "crudNature")]
    pub crud_nature: String,
    #[serde(default)]
    pub additional_confirmation: String,
    pub chain: String,
    #[serde(default)]
    pub ctor: Vec<String>,
    #[serde(default)]
    pub fields: Vec<CommandFieldDoc>,
    #[serde(default)]
    pub info: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandFieldDoc {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub validation_regex: String,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, rename = "hideIfDefaultValue")]
    pub hide_if_default_value: bool,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub placeholder: String,
}

// =============================================================================
// UI routes document
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiRouteDoc {
    pub id: String,
    pub path: String,
    #[serde(default)]
    pub query: Vec<QueryParamDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryParamDoc {
    pub key: String,
    #[serde(default, rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub nullable: bool,
}
