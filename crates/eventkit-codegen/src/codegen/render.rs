//! Template rendering and atomic file publication.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::diagnostic::CodegenError;

/// A helper failure, surfaced as a template error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HelperError(pub String);

/// Helpers templates may call as filters. Handed to the [`Renderer`] by the
/// caller; there is no global registry.
pub trait TemplateHelpers: Send + Sync {
    /// `"getUser"` => `"GetUser"`
    fn uppercase_first(&self, value: &str) -> Result<String, HelperError> {
        if value.is_empty() {
            return Err(HelperError("uppercase_first: empty input".to_string()));
        }
        Ok(super::uppercase_first(value))
    }

    /// Single-quoted JavaScript string literal.
    fn js_quote(&self, value: &str) -> Result<String, HelperError> {
        Ok(super::js_string_literal(value))
    }

    /// `"/search?q={q}"` => `"/search"`
    fn strip_query(&self, value: &str) -> Result<String, HelperError> {
        Ok(super::strip_query(value).to_string())
    }

    /// Double-quoted Go string literal.
    fn go_quote(&self, value: &str) -> Result<String, HelperError> {
        Ok(super::go_string_literal(value))
    }
}

/// The stock helper set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHelpers;

impl TemplateHelpers for StandardHelpers {}

type HelperFn = fn(&dyn TemplateHelpers, &str) -> Result<String, HelperError>;

const HELPERS: &[(&str, HelperFn)] = &[
    ("uppercase_first", |h, v| h.uppercase_first(v)),
    ("js_quote", |h, v| h.js_quote(v)),
    ("strip_query", |h, v| h.strip_query(v)),
    ("go_quote", |h, v| h.go_quote(v)),
];

/// Renders templates against immutable contexts. Rendering has no side
/// effects; output goes to memory only.
#[derive(Clone)]
pub struct Renderer {
    helpers: Arc<dyn TemplateHelpers>,
}

impl Renderer {
    pub fn new(helpers: impl TemplateHelpers + 'static) -> Self {
        Self {
            helpers: Arc::new(helpers),
        }
    }

    fn environment<'source>(&self) -> Environment<'source> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        for (name, helper) in HELPERS {
            let helpers = Arc::clone(&self.helpers);
            let helper = *helper;
            env.add_filter(*name, move |value: String| {
                helper(helpers.as_ref(), &value).map_err(|e| {
                    minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string())
                })
            });
        }

        env
    }

    /// Renders `source` under `name` with `context`.
    pub fn render<S: Serialize>(
        &self,
        name: &str,
        source: &str,
        context: &S,
    ) -> Result<String, CodegenError> {
        let mut env = self.environment();
        env.add_template(name, source)
            .map_err(|e| CodegenError::template(name, e.to_string()))?;
        let template = env
            .get_template(name)
            .map_err(|e| CodegenError::template(name, e.to_string()))?;
        template
            .render(context)
            .map_err(|e| CodegenError::template(name, e.to_string()))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(StandardHelpers)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}

/// Publishes a file atomically: the content is written to a temporary file in
/// the target directory which is then renamed over the target. On failure the
/// previous target is left untouched.
pub fn write_file_atomically<F>(path: &Path, write: F) -> Result<(), CodegenError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e.to_string()))?;

    let mut temp =
        NamedTempFile::new_in(parent).map_err(|e| CodegenError::io(parent, e.to_string()))?;

    write(temp.as_file_mut())
        .and_then(|_| temp.as_file_mut().flush())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| CodegenError::io(path, e.to_string()))?;

    temp.persist(path)
        .map_err(|e| CodegenError::io(path, e.error.to_string()))?;

    Ok(())
}

/// Publishes in-memory content atomically.
pub fn publish(path: &Path, content: &str) -> Result<(), CodegenError> {
    write_file_atomically(path, |w| w.write_all(content.as_bytes()))
}
