//! Route compilation for UI routes and REST endpoints.
//!
//! A path template like `/accounts/{id}` is compiled into:
//! - an anchored matcher where every placeholder captures `[^/]+`
//! - a URL builder that percent-encodes substituted values
//! - for UI routes, a strict query decoder (typed, presence-checked, and
//!   rejecting undeclared keys)
//!
//! The Rust matcher here and the generated TypeScript matcher implement the
//! same semantics.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::ir::{
    EndpointSpec, PathTemplate, QueryParamSpec, QueryParamType, UiRouteSpec,
};
use super::type_mapper::TypeExpressions;
use super::{go_string_literal, uppercase_first};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex should be valid")
});

/// Why a path template was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathTemplateError {
    #[error("malformed placeholder near '{0}'")]
    MalformedPlaceholder(String),
    #[error("placeholder '{{{0}}}' appears more than once")]
    DuplicatePlaceholder(String),
    #[error("query part '{0}' must look like key={{placeholder}}")]
    MalformedQuery(String),
}

/// A query decoding failure of a route whose path matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParamError {
    #[error("invalid value '{value}' for query parameter '{key}'")]
    InvalidQueryParam { key: String, value: String },
    #[error("missing required query parameter '{key}'")]
    MissingQueryParam { key: String },
}

/// One piece of a path: literal text or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Splits text into literal and placeholder segments.
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Literal(text[last..whole.start()].to_string()));
        }
        out.push(Segment::Placeholder(name.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Literal(text[last..].to_string()));
    }
    out
}

/// `"/accounts/{id}/{tab}"` => `["id", "tab"]`
pub fn extract_placeholders(text: &str) -> Vec<String> {
    segments(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Parses a path template, validating placeholder grammar and uniqueness.
pub fn parse_path_template(raw: &str) -> Result<PathTemplate, PathTemplateError> {
    let (hash, body) = match raw.strip_prefix('#') {
        Some(rest) => ("#", rest),
        None => ("", raw),
    };
    let (path_part, query_part) = match body.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (body, None),
    };

    check_braces(path_part)?;
    let path_placeholders = extract_placeholders(path_part);

    let mut query_placeholders = Vec::new();
    if let Some(query) = query_part.filter(|q| !q.is_empty()) {
        for pair in query.split('&') {
            let malformed = || PathTemplateError::MalformedQuery(pair.to_string());
            let (key, value) = pair.split_once('=').ok_or_else(malformed)?;
            match segments(value).as_slice() {
                [Segment::Placeholder(name)] if !key.is_empty() => {
                    query_placeholders.push((key.to_string(), name.clone()));
                }
                _ => return Err(malformed()),
            }
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for name in path_placeholders
        .iter()
        .chain(query_placeholders.iter().map(|(_, name)| name))
    {
        if seen.contains(&name.as_str()) {
            return Err(PathTemplateError::DuplicatePlaceholder(name.clone()));
        }
        seen.push(name);
    }

    Ok(PathTemplate {
        raw: raw.to_string(),
        path: format!("{}{}", hash, path_part),
        path_placeholders,
        query_placeholders,
    })
}

fn check_braces(text: &str) -> Result<(), PathTemplateError> {
    for segment in segments(text) {
        if let Segment::Literal(literal) = segment {
            if literal.contains('{') || literal.contains('}') {
                return Err(PathTemplateError::MalformedPlaceholder(literal));
            }
        }
    }
    Ok(())
}

/// Escapes a literal for use inside a JavaScript regex literal.
fn escape_js_regex(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if "\\^$.|?*+()[]{}/".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Builds the anchored matcher source for a path, escaping literals with `escape`.
fn pattern_source(path: &str, escape: impl Fn(&str) -> String) -> String {
    let mut pattern = String::from("^");
    for segment in segments(path) {
        match segment {
            Segment::Literal(literal) => pattern.push_str(&escape(&literal)),
            Segment::Placeholder(_) => pattern.push_str("([^/]+)"),
        }
    }
    pattern.push('$');
    pattern
}

/// `"/account/{id}/edit"` => `/^\/account\/([^/]+)\/edit$/`
pub fn js_regex_literal(path: &str) -> String {
    format!("/{}/", pattern_source(path, escape_js_regex).replace("[^/]", "[^\\/]"))
}

/// A decoded route parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

/// Parameters captured by a successful match, keyed by placeholder/query key.
pub type RouteParams = BTreeMap<String, ParamValue>;

/// A route compiled into a matcher and URL builder.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub id: String,
    path: String,
    pattern: Regex,
    placeholders: Vec<String>,
    query: Vec<QueryParamSpec>,
}

impl CompiledRoute {
    pub fn compile(
        id: &str,
        template: &PathTemplate,
        query: &[QueryParamSpec],
    ) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&pattern_source(&template.path, regex::escape))?;
        Ok(Self {
            id: id.to_string(),
            path: template.path.clone(),
            pattern,
            placeholders: template.path_placeholders.clone(),
            query: query.to_vec(),
        })
    }

    pub fn from_ui_route(route: &UiRouteSpec) -> Result<Self, regex::Error> {
        Self::compile(&route.id, &route.path, &route.query)
    }

    pub fn pattern_source(&self) -> &str {
        self.pattern.as_str()
    }

    /// Substitutes percent-encoded values into the path. Returns `None` when a
    /// placeholder has no value.
    pub fn build_url(&self, values: &BTreeMap<String, String>) -> Option<String> {
        let mut url = String::new();
        for segment in segments(&self.path) {
            match segment {
                Segment::Literal(literal) => url.push_str(&literal),
                Segment::Placeholder(name) => {
                    url.push_str(&urlencoding::encode(values.get(&name)?));
                }
            }
        }

        let query: Vec<String> = self
            .query
            .iter()
            .filter_map(|q| {
                values.get(&q.key).map(|v| {
                    format!("{}={}", urlencoding::encode(&q.key), urlencoding::encode(v))
                })
            })
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        Some(url)
    }

    /// Matches only the path part.
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        let caps = self.pattern.captures(path)?;
        let mut params = RouteParams::new();
        for (index, name) in self.placeholders.iter().enumerate() {
            let raw = caps.get(index + 1)?.as_str();
            let value = urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            params.insert(name.clone(), ParamValue::Str(value));
        }
        Some(params)
    }

    /// Matches path and query.
    ///
    /// Returns `Ok(None)` when the path does not match or an undeclared query
    /// key is present, and an error when a declared parameter is missing or
    /// does not decode.
    pub fn match_request(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Option<RouteParams>, QueryParamError> {
        let Some(mut params) = self.match_path(path) else {
            return Ok(None);
        };

        if query
            .iter()
            .any(|(key, _)| !self.query.iter().any(|spec| &spec.key == key))
        {
            return Ok(None);
        }

        for spec in &self.query {
            let raw = query
                .iter()
                .find(|(key, _)| key == &spec.key)
                .map(|(_, value)| value.as_str());

            let Some(raw) = raw else {
                if spec.nullable {
                    continue;
                }
                return Err(QueryParamError::MissingQueryParam {
                    key: spec.key.clone(),
                });
            };

            let value = match spec.param_type {
                QueryParamType::String => ParamValue::Str(raw.to_string()),
                QueryParamType::Integer => raw
                    .parse::<i64>()
                    .map(ParamValue::Int)
                    .map_err(|_| QueryParamError::InvalidQueryParam {
                        key: spec.key.clone(),
                        value: raw.to_string(),
                    })?,
            };
            params.insert(spec.key.clone(), value);
        }

        Ok(Some(params))
    }
}

/// A successful route-table lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    pub route_id: &'a str,
    pub params: RouteParams,
}

/// Routes tried in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn compile(routes: &[UiRouteSpec]) -> Result<Self, regex::Error> {
        let routes = routes
            .iter()
            .map(CompiledRoute::from_ui_route)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// Returns the first route that fully matches `url` (path plus optional
    /// `?query`).
    ///
    /// A route whose path matched but whose query failed to decode is skipped;
    /// if nothing later matches, the first such error is returned.
    pub fn resolve(&self, url: &str) -> Result<Option<RouteMatch<'_>>, QueryParamError> {
        let (path, query) = split_url(url);
        let mut first_error = None;

        for route in &self.routes {
            match route.match_request(path, &query) {
                Ok(Some(params)) => {
                    return Ok(Some(RouteMatch {
                        route_id: &route.id,
                        params,
                    }));
                }
                Ok(None) => {}
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// Like [`resolve`](Self::resolve), calling `not_found` with the path when
    /// no route matches.
    pub fn dispatch<T>(
        &self,
        url: &str,
        on_match: impl FnOnce(RouteMatch<'_>) -> T,
        not_found: impl FnOnce(&str) -> T,
    ) -> Result<T, QueryParamError> {
        match self.resolve(url)? {
            Some(matched) => Ok(on_match(matched)),
            None => Ok(not_found(split_url(url).0)),
        }
    }
}

/// `"/search?q=a%20b"` => `("/search", [("q", "a b")])`
fn split_url(url: &str) -> (&str, Vec<(String, String)>) {
    match url.split_once('?') {
        Some((path, query)) => (
            path,
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        ),
        None => (url, Vec::new()),
    }
}

// =============================================================================
// Template contexts
// =============================================================================

/// A positional path placeholder, as needed by generated matchers.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderContext {
    pub name: String,
    /// Capture group index (1-based).
    pub group: usize,
}

/// A typed query parameter, as needed by generated decoders.
#[derive(Debug, Clone, Serialize)]
pub struct QueryParamContext {
    pub key: String,
    pub integer: bool,
    pub nullable: bool,
    pub ts_type: &'static str,
    /// Name of the generated decoding function.
    pub decoder: &'static str,
}

/// Everything the UI-route templates need for one route.
#[derive(Debug, Clone, Serialize)]
pub struct UiRouteContext {
    pub id: String,
    pub opts_name: String,
    pub has_opts: bool,
    pub path_raw: String,
    /// Path for backend registration; `None` for hash routes.
    pub backend_path: Option<String>,
    pub js_regex: String,
    pub ts_path: String,
    pub placeholders: Vec<PlaceholderContext>,
    pub query: Vec<QueryParamContext>,
}

pub fn ui_route_context(route: &UiRouteSpec) -> UiRouteContext {
    let placeholders: Vec<PlaceholderContext> = route
        .path
        .path_placeholders
        .iter()
        .enumerate()
        .map(|(index, name)| PlaceholderContext {
            name: name.clone(),
            group: index + 1,
        })
        .collect();

    let query: Vec<QueryParamContext> = route
        .query
        .iter()
        .map(|q| QueryParamContext {
            key: q.key.clone(),
            integer: q.param_type == QueryParamType::Integer,
            nullable: q.nullable,
            ts_type: match q.param_type {
                QueryParamType::String => "string",
                QueryParamType::Integer => "number",
            },
            decoder: match (q.param_type, q.nullable) {
                (QueryParamType::String, false) => "requiredString",
                (QueryParamType::String, true) => "optionalString",
                (QueryParamType::Integer, false) => "requiredInteger",
                (QueryParamType::Integer, true) => "optionalInteger",
            },
        })
        .collect();

    UiRouteContext {
        id: route.id.clone(),
        opts_name: format!("{}Opts", uppercase_first(&route.id)),
        has_opts: !placeholders.is_empty() || !query.is_empty(),
        path_raw: route.path.raw.clone(),
        backend_path: (!route.path.path.starts_with('#')).then(|| route.path.path.clone()),
        js_regex: js_regex_literal(&route.path.path),
        ts_path: ts_template_path(&route.path.path, "opts."),
        placeholders,
        query,
    }
}

/// Everything the endpoint templates need for one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointContext {
    pub name: String,
    pub name_upper: String,
    pub method: &'static str,
    pub path_raw: String,
    /// Path without the query, for route registration.
    pub registration_path: String,
    pub chain: String,
    pub description: String,
    pub consumes: Option<TypeExpressions>,
    pub produces: Option<TypeExpressions>,
    pub go_args: String,
    pub go_url: String,
    pub go_handler_signature: String,
    pub go_handler_call_args: &'static str,
    pub ts_args: String,
    pub ts_result: String,
    pub ts_url_args: String,
    pub ts_path: String,
}

pub fn endpoint_context(
    endpoint: &EndpointSpec,
    consumes: Option<TypeExpressions>,
    produces: Option<TypeExpressions>,
) -> EndpointContext {
    let template = &endpoint.path;
    let names: Vec<&String> = template
        .path_placeholders
        .iter()
        .chain(template.query_placeholders.iter().map(|(_, name)| name))
        .collect();

    let go_args = names
        .iter()
        .map(|name| format!("{} string", name))
        .collect::<Vec<_>>()
        .join(", ");

    let ts_url_args = names
        .iter()
        .map(|name| format!("{}: string", name))
        .collect::<Vec<_>>()
        .join(", ");

    let ts_args = match &consumes {
        Some(body) if ts_url_args.is_empty() => format!("body: {}", body.ts),
        Some(body) => format!("{}, body: {}", ts_url_args, body.ts),
        None => ts_url_args.clone(),
    };

    let name_upper = uppercase_first(&endpoint.name);
    let go_handler_signature = format!(
        "{}(rctx *httpauth.RequestContext, {}w http.ResponseWriter, r *http.Request){}",
        name_upper,
        consumes
            .as_ref()
            .map(|input| format!("input {}, ", input.go))
            .unwrap_or_default(),
        produces
            .as_ref()
            .map(|output| format!(" *{}", output.go))
            .unwrap_or_default()
    );
    let go_handler_call_args = if consumes.is_some() {
        "rctx, *input, w, r"
    } else {
        "rctx, w, r"
    };
    let ts_result = produces
        .as_ref()
        .map(|output| output.ts.clone())
        .unwrap_or_else(|| "void".to_string());

    EndpointContext {
        name: endpoint.name.clone(),
        name_upper,
        method: endpoint.method.as_str(),
        path_raw: template.raw.clone(),
        registration_path: template.path.clone(),
        chain: endpoint.middleware_chain.clone(),
        description: endpoint.description.clone(),
        consumes,
        produces,
        go_args,
        go_url: go_url_expression(template),
        go_handler_signature,
        go_handler_call_args,
        ts_args,
        ts_result,
        ts_url_args,
        ts_path: ts_template_path_with_query(template),
    }
}

/// Go string expression building the URL of an endpoint.
///
/// `/users/{id}?q={q}` => `"/users/" + url.PathEscape(id) + "?q=" + url.QueryEscape(q)`
fn go_url_expression(template: &PathTemplate) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut literal = String::new();

    for segment in segments(&template.path) {
        match segment {
            Segment::Literal(text) => literal.push_str(&text),
            Segment::Placeholder(name) => {
                if !literal.is_empty() {
                    parts.push(go_string_literal(&literal));
                    literal.clear();
                }
                parts.push(format!("url.PathEscape({})", name));
            }
        }
    }

    for (index, (key, name)) in template.query_placeholders.iter().enumerate() {
        literal.push(if index == 0 { '?' } else { '&' });
        literal.push_str(key);
        literal.push('=');
        parts.push(go_string_literal(&literal));
        literal.clear();
        parts.push(format!("url.QueryEscape({})", name));
    }

    if !literal.is_empty() || parts.is_empty() {
        parts.push(go_string_literal(&literal));
    }

    parts.join(" + ")
}

fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Body of a TS template literal with placeholders substituted from `prefix`.
fn ts_template_path(path: &str, prefix: &str) -> String {
    segments(path)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(text) => escape_template_literal(&text),
            Segment::Placeholder(name) => {
                format!("${{encodeURIComponent({}{})}}", prefix, name)
            }
        })
        .collect()
}

fn ts_template_path_with_query(template: &PathTemplate) -> String {
    let mut out = ts_template_path(&template.path, "");
    for (index, (key, name)) in template.query_placeholders.iter().enumerate() {
        out.push(if index == 0 { '?' } else { '&' });
        out.push_str(&escape_template_literal(key));
        out.push_str(&format!("=${{encodeURIComponent({})}}", name));
    }
    out
}
