//! Datatype declarations and flattening.

use std::collections::{BTreeSet, HashSet};

/// Primitive type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Boolean,
    Integer,
    Date,
    DateTime,
    Binary,
    Object,
    Array,
}

impl Primitive {
    /// Parses a primitive keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "date" => Some(Self::Date),
            "datetime" => Some(Self::DateTime),
            "binary" => Some(Self::Binary),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Binary => "binary",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// A reference to a named enum or struct, optionally in another module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    /// Module id for cross-module references (`othermodule.Name`).
    pub module: Option<String>,
    pub name: String,
}

impl TypeRef {
    /// Parses `Name` or `module.Name`. Returns `None` unless the type name part
    /// begins with an uppercase letter.
    pub fn parse(raw: &str) -> Option<Self> {
        let (module, name) = match raw.rsplit_once('.') {
            Some((module, name)) if !module.is_empty() => (Some(module.to_string()), name),
            Some(_) => return None,
            None => (None, raw),
        };

        if !begins_with_uppercase(name) {
            return None;
        }

        Some(Self {
            module,
            name: name.to_string(),
        })
    }

    /// Returns `module.Name` or `Name`.
    pub fn qualified(&self) -> String {
        match &self.module {
            Some(module) => format!("{}.{}", module, self.name),
            None => self.name.clone(),
        }
    }
}

/// Explicit classification of a type name, computed once at lowering time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(Primitive),
    CustomReference(TypeRef),
}

impl TypeKind {
    /// Classifies a raw type name. Returns `None` for names that are neither a
    /// primitive keyword nor a custom reference.
    pub fn classify(name: &str) -> Option<Self> {
        if let Some(primitive) = Primitive::from_keyword(name) {
            return Some(Self::Primitive(primitive));
        }
        TypeRef::parse(name).map(Self::CustomReference)
    }
}

fn begins_with_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Whether a type name denotes a custom (enum or struct) reference.
pub fn is_custom_type(name: &str) -> bool {
    begins_with_uppercase(name)
}

/// A datatype declaration node.
#[derive(Debug, Clone, PartialEq)]
pub struct DatatypeDef {
    /// The name as written in the source document.
    pub name_raw: String,
    pub kind: TypeKind,
    pub nullable: bool,
    /// Element type, only for `array`.
    pub of: Option<Box<DatatypeDef>>,
    /// Fields in declaration order, only for `object`.
    pub fields: Vec<(String, DatatypeDef)>,
}

impl DatatypeDef {
    pub fn primitive(primitive: Primitive) -> Self {
        Self {
            name_raw: primitive.keyword().to_string(),
            kind: TypeKind::Primitive(primitive),
            nullable: false,
            of: None,
            fields: Vec::new(),
        }
    }

    pub fn reference(type_ref: TypeRef) -> Self {
        Self {
            name_raw: type_ref.qualified(),
            kind: TypeKind::CustomReference(type_ref),
            nullable: false,
            of: None,
            fields: Vec::new(),
        }
    }

    pub fn object(fields: Vec<(String, DatatypeDef)>) -> Self {
        Self {
            fields,
            ..Self::primitive(Primitive::Object)
        }
    }

    pub fn array(of: DatatypeDef) -> Self {
        Self {
            of: Some(Box::new(of)),
            ..Self::primitive(Primitive::Array)
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn is_custom_type(&self) -> bool {
        matches!(self.kind, TypeKind::CustomReference(_))
    }

    pub fn as_reference(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::CustomReference(type_ref) => Some(type_ref),
            TypeKind::Primitive(_) => None,
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match &self.kind {
            TypeKind::Primitive(primitive) => Some(*primitive),
            TypeKind::CustomReference(_) => None,
        }
    }

    /// Every distinct node reachable from this one (itself included),
    /// deduplicated by `name_raw`. Custom references are not expanded.
    pub fn flatten(&self) -> Vec<&DatatypeDef> {
        flatten_all(std::iter::once(self))
    }

    /// Children traversed by flattening.
    fn children(&self) -> impl Iterator<Item = &DatatypeDef> {
        self.of
            .iter()
            .map(|of| &**of)
            .chain(self.fields.iter().map(|(_, typ)| typ))
    }
}

/// Flattens several roots into one deduplicated list (depth-first pre-order,
/// first occurrence wins).
pub fn flatten_all<'a>(roots: impl IntoIterator<Item = &'a DatatypeDef>) -> Vec<&'a DatatypeDef> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut stack: Vec<&DatatypeDef> = Vec::new();

    for root in roots {
        stack.push(root);
        while let Some(node) = stack.pop() {
            if seen.insert(node.name_raw.as_str()) {
                out.push(node);
            }
            let children: Vec<&DatatypeDef> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
    }

    out
}

/// Ids of other modules referenced by the given (flattened) types, sorted.
pub fn unique_module_ids(types: &[&DatatypeDef]) -> Vec<String> {
    types
        .iter()
        .filter_map(|typ| typ.as_reference())
        .filter_map(|type_ref| type_ref.module.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Primitive categories that need dedicated imports in generated files.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PrimitiveFlags {
    pub date: bool,
    pub datetime: bool,
    pub binary: bool,
}

impl PrimitiveFlags {
    pub fn from_types(types: &[&DatatypeDef]) -> Self {
        let mut flags = Self::default();
        for typ in types {
            match typ.as_primitive() {
                Some(Primitive::Date) => flags.date = true,
                Some(Primitive::DateTime) => flags.datetime = true,
                Some(Primitive::Binary) => flags.binary = true,
                _ => {}
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> DatatypeDef {
        DatatypeDef::primitive(Primitive::String)
    }

    fn reference(name: &str) -> DatatypeDef {
        DatatypeDef::reference(TypeRef::parse(name).unwrap())
    }

    #[test]
    fn test_begins_with_uppercase_letter() {
        assert!(is_custom_type("Foo"));
        assert!(!is_custom_type("foo"));
        assert!(!is_custom_type("!perkele"));
        assert!(!is_custom_type(""));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            TypeKind::classify("datetime"),
            Some(TypeKind::Primitive(Primitive::DateTime))
        );
        assert_eq!(
            TypeKind::classify("Person"),
            Some(TypeKind::CustomReference(TypeRef {
                module: None,
                name: "Person".to_string()
            }))
        );
        assert_eq!(
            TypeKind::classify("usertypes.Person"),
            Some(TypeKind::CustomReference(TypeRef {
                module: Some("usertypes".to_string()),
                name: "Person".to_string()
            }))
        );
        assert_eq!(TypeKind::classify("usertypes.person"), None);
        assert_eq!(TypeKind::classify(".Person"), None);
        assert_eq!(TypeKind::classify("!perkele"), None);
        assert_eq!(TypeKind::classify("strin"), None);
    }

    #[test]
    fn test_flatten_datatype() {
        let person = DatatypeDef::object(vec![
            ("Name".to_string(), string()),
            ("Age".to_string(), DatatypeDef::primitive(Primitive::Boolean)),
        ]);

        let mut names: Vec<&str> = person.flatten().iter().map(|t| t.name_raw.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["boolean", "object", "string"]);
    }

    #[test]
    fn test_flatten_does_not_expand_references() {
        let typ = DatatypeDef::array(reference("Person"));
        let names: Vec<&str> = typ.flatten().iter().map(|t| t.name_raw.as_str()).collect();
        assert_eq!(names, vec!["array", "Person"]);
    }

    #[test]
    fn test_unique_module_ids() {
        let typ = DatatypeDef::object(vec![
            ("a".to_string(), reference("billing.Invoice")),
            ("b".to_string(), DatatypeDef::array(reference("accounts.User"))),
            ("c".to_string(), reference("billing.Invoice")),
            ("d".to_string(), reference("Local")),
        ]);
        assert_eq!(unique_module_ids(&typ.flatten()), vec!["accounts", "billing"]);
    }

    #[test]
    fn test_primitive_flags() {
        let typ = DatatypeDef::object(vec![
            ("born".to_string(), DatatypeDef::primitive(Primitive::Date)),
            (
                "avatar".to_string(),
                DatatypeDef::primitive(Primitive::Binary).with_nullable(true),
            ),
        ]);
        let flags = PrimitiveFlags::from_types(&typ.flatten());
        assert_eq!(
            flags,
            PrimitiveFlags {
                date: true,
                datetime: false,
                binary: true
            }
        );
    }
}
