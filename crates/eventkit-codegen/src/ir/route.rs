//! Path templates and UI route IR.

/// A path template such as `/accounts/{id}` or `#/search?q={q}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    /// As written in the source document.
    pub raw: String,
    /// Path part, without the query. Keeps a leading `#` for hash routes.
    pub path: String,
    /// Placeholders of the path part in order of appearance.
    pub path_placeholders: Vec<String>,
    /// `(key, placeholder)` pairs of the query part (`?q={q}`).
    pub query_placeholders: Vec<(String, String)>,
}

/// Value type of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParamType {
    String,
    Integer,
}

impl QueryParamType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "" | "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            _ => None,
        }
    }
}

/// A typed query parameter of a UI route.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParamSpec {
    pub key: String,
    pub param_type: QueryParamType,
    pub nullable: bool,
}

/// A frontend route.
#[derive(Debug, Clone)]
pub struct UiRouteSpec {
    pub id: String,
    pub path: PathTemplate,
    pub query: Vec<QueryParamSpec>,
}
