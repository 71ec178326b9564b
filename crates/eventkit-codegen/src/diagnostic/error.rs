//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification of a [`CodegenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input document.
    SpecLoad,
    /// Internally inconsistent spec.
    SpecValidation,
    /// Rendering-time failure.
    Template,
    /// Directory creation or atomic publish failure.
    FileSystem,
}

/// Errors that can occur during generation. All of them abort the run.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CodegenError {
    // =========================================================================
    // Load Errors
    // =========================================================================
    #[error("Failed to read '{}': {message}", path.display())]
    #[diagnostic(code(eventkit::load::read_failed))]
    ReadFailed {
        path: PathBuf,
        message: String,
    },

    #[error("[{module}] failed to decode '{}': {message}", path.display())]
    #[diagnostic(
        code(eventkit::load::decode_failed),
        help("Spec documents are decoded strictly: unknown keys are rejected.")
    )]
    DecodeFailed {
        module: String,
        path: PathBuf,
        message: String,
    },

    #[error("Invalid configuration '{}': {message}", path.display())]
    #[diagnostic(code(eventkit::load::invalid_config))]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    #[error("[{module}] unknown type '{name}' in {location}")]
    #[diagnostic(
        code(eventkit::load::unknown_type),
        help("Primitive types are: string, boolean, integer, date, datetime, binary, object, array. Custom types start with an uppercase letter.")
    )]
    UnknownType {
        module: String,
        location: String,
        name: String,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("[{module}] unresolved type reference '{name}' in {location}")]
    #[diagnostic(
        code(eventkit::validation::unresolved_reference),
        help("Declare the type or enum in this module's types document, or qualify it with a module id of this run.")
    )]
    UnresolvedReference {
        module: String,
        location: String,
        name: String,
    },

    #[error("[{module}] command '{command}' field '{field}' has unmapped type '{type_tag}'")]
    #[diagnostic(code(eventkit::validation::unmapped_type))]
    UnmappedFieldType {
        module: String,
        command: String,
        field: String,
        type_tag: String,
    },

    #[error("[{module}] command '{command}' field '{field}' of type '{type_tag}' has no UI kind")]
    #[diagnostic(code(eventkit::validation::unmapped_ui_kind))]
    UnmappedUiKind {
        module: String,
        command: String,
        field: String,
        type_tag: String,
    },

    #[error("[{module}] command '{command}' constructor argument '{arg}' has no matching field")]
    #[diagnostic(code(eventkit::validation::unknown_ctor_arg))]
    UnknownCtorArg {
        module: String,
        command: String,
        arg: String,
    },

    #[error("[{module}] duplicate {what} '{name}' in {location}")]
    #[diagnostic(code(eventkit::validation::duplicate))]
    Duplicate {
        module: String,
        location: String,
        what: &'static str,
        name: String,
    },

    #[error("[{module}] field '{name}' in {location} clashes with the generated method '{method}'")]
    #[diagnostic(
        code(eventkit::validation::reserved_name),
        help("Go structs cannot have a field and a method of the same name. Rename the field.")
    )]
    ReservedName {
        module: String,
        location: String,
        name: String,
        method: &'static str,
    },

    #[error("[{module}] invalid validation regex for {location}: {message}")]
    #[diagnostic(code(eventkit::validation::invalid_regex))]
    InvalidRegex {
        module: String,
        location: String,
        message: String,
    },

    #[error("[{module}] invalid path template '{path}' in {location}: {message}")]
    #[diagnostic(
        code(eventkit::validation::invalid_path),
        help("Placeholders are written as {{identifier}}.")
    )]
    InvalidPath {
        module: String,
        location: String,
        path: String,
        message: String,
    },

    // =========================================================================
    // Template Errors
    // =========================================================================
    #[error("Failed to render '{name}': {message}")]
    #[diagnostic(code(eventkit::template::render_failed))]
    Template {
        name: String,
        message: String,
    },

    // =========================================================================
    // File System Errors
    // =========================================================================
    #[error("Failed to write '{}': {message}", path.display())]
    #[diagnostic(code(eventkit::fs::write_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },
}

impl CodegenError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a template error.
    pub fn template(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ReadFailed { .. }
            | Self::DecodeFailed { .. }
            | Self::InvalidConfig { .. }
            | Self::UnknownType { .. } => ErrorCategory::SpecLoad,
            Self::UnresolvedReference { .. }
            | Self::UnmappedFieldType { .. }
            | Self::UnmappedUiKind { .. }
            | Self::UnknownCtorArg { .. }
            | Self::Duplicate { .. }
            | Self::ReservedName { .. }
            | Self::InvalidRegex { .. }
            | Self::InvalidPath { .. } => ErrorCategory::SpecValidation,
            Self::Template { .. } => ErrorCategory::Template,
            Self::IoError { .. } => ErrorCategory::FileSystem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = CodegenError::UnknownCtorArg {
            module: "users".to_string(),
            command: "user.create".to_string(),
            arg: "email".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::SpecValidation);
        assert_eq!(
            err.to_string(),
            "[users] command 'user.create' constructor argument 'email' has no matching field"
        );

        assert_eq!(CodegenError::io("out", "denied").category(), ErrorCategory::FileSystem);
        assert_eq!(CodegenError::template("x", "y").category(), ErrorCategory::Template);
    }
}
