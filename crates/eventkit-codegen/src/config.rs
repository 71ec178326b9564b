//! Generator configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostic::CodegenError;

/// Configuration for one generator run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// Root every output path is relative to.
    pub out_dir: PathBuf,

    /// Go import path prefix of generated modules, e.g. `github.com/acme/app/`.
    pub backend_module_prefix: String,

    /// TypeScript import prefix of generated modules, e.g. `generated/`.
    pub frontend_module_prefix: String,

    /// Go import path of the runtime packages (`command`, `event`, `guts`, `httpauth`).
    pub backend_runtime_package: String,

    /// TypeScript import prefix of the runtime modules (`types`, `commandtypes`, `httputil`).
    pub frontend_runtime_package: String,

    /// Also generate Markdown docs.
    pub autogenerate_module_docs: bool,

    pub modules: Vec<ModuleConfig>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            backend_module_prefix: String::new(),
            frontend_module_prefix: String::new(),
            backend_runtime_package: "github.com/eventkit/eventkit".to_string(),
            frontend_runtime_package: "eventkit/".to_string(),
            autogenerate_module_docs: false,
            modules: Vec::new(),
        }
    }
}

/// Spec documents of one module. Absent documents are treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
    /// e.g. `server/usertypes`
    pub path: String,
    #[serde(default)]
    pub types: Option<PathBuf>,
    #[serde(default)]
    pub events: Option<PathBuf>,
    #[serde(default)]
    pub commands: Option<PathBuf>,
    #[serde(default)]
    pub ui_routes: Option<PathBuf>,
}

impl ModuleConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        for doc in [
            &mut self.types,
            &mut self.events,
            &mut self.commands,
            &mut self.ui_routes,
        ] {
            if let Some(path) = doc {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

impl CodegenConfig {
    /// Reads the configuration from a JSON file. Relative paths inside it are
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let raw = fs::read_to_string(path).map_err(|e| CodegenError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config: Self =
            serde_json::from_str(&raw).map_err(|e| CodegenError::InvalidConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let base = path.parent().unwrap_or(Path::new("."));
        if config.out_dir.is_relative() {
            config.out_dir = base.join(&config.out_dir);
        }
        for module in &mut config.modules {
            module.resolve_against(base);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ErrorCategory;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codegen.json");
        fs::write(
            &path,
            r#"{
                "out_dir": "out",
                "backend_module_prefix": "github.com/acme/app/",
                "autogenerate_module_docs": true,
                "modules": [
                    {"path": "server/users", "types": "specs/users/types.json", "commands": "/abs/commands.json"}
                ]
            }"#,
        )
        .unwrap();

        let config = CodegenConfig::load(&path).unwrap();
        assert_eq!(config.out_dir, dir.path().join("out"));
        assert_eq!(config.backend_module_prefix, "github.com/acme/app/");
        assert_eq!(config.frontend_runtime_package, "eventkit/");
        assert!(config.autogenerate_module_docs);

        let module = &config.modules[0];
        assert_eq!(module.types, Some(dir.path().join("specs/users/types.json")));
        assert_eq!(module.commands, Some(PathBuf::from("/abs/commands.json")));
        assert_eq!(module.events, None);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codegen.json");
        fs::write(&path, r#"{"outdir": "out"}"#).unwrap();

        let err = CodegenConfig::load(&path).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::SpecLoad);
        assert!(matches!(err, CodegenError::InvalidConfig { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = CodegenConfig::load(Path::new("/nonexistent/codegen.json")).unwrap_err();
        assert!(matches!(err, CodegenError::ReadFailed { .. }));
    }
}
