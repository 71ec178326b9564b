//! Types document: named types, enums, string constants and REST endpoints.

use super::{DatatypeDef, PathTemplate};

/// A named struct-like type declaration.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub name: String,
    pub datatype: DatatypeDef,
}

/// A string-backed enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    /// Raw member values in declaration order.
    pub members: Vec<String>,
}

/// A string constant shared by backend and frontend.
#[derive(Debug, Clone)]
pub struct StringConst {
    pub key: String,
    pub value: String,
}

/// HTTP methods supported by REST endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A REST endpoint declaration.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub name: String,
    pub method: HttpMethod,
    pub path: PathTemplate,
    pub middleware_chain: String,
    pub consumes: Option<DatatypeDef>,
    pub produces: Option<DatatypeDef>,
    pub description: String,
}

/// The lowered types document of a module.
#[derive(Debug, Clone, Default)]
pub struct TypesFile {
    pub types: Vec<NamedType>,
    pub enums: Vec<EnumDef>,
    pub string_consts: Vec<StringConst>,
    pub endpoints: Vec<EndpointSpec>,
}

impl TypesFile {
    pub fn enum_by_name(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn type_by_name(&self, name: &str) -> Option<&NamedType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Every datatype root declared in this document.
    pub fn datatype_roots(&self) -> impl Iterator<Item = &DatatypeDef> {
        self.types.iter().map(|t| &t.datatype).chain(
            self.endpoints
                .iter()
                .flat_map(|e| e.consumes.iter().chain(e.produces.iter())),
        )
    }
}
