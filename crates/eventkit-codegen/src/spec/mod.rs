//! Loading of module spec documents.
//!
//! A run loads every module first: documents are decoded, lowered into the IR
//! and validated before anything is rendered. Command fields may reference
//! types of other modules, so lowering happens in two passes: declarations of
//! every module, then commands against all of them.

pub mod document;
pub mod to_ir;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::ModuleConfig;
use crate::diagnostic::CodegenError;
use crate::ir::{module_id_from_path, Module, SpecPresence};
use crate::validate;
use document::{CommandDoc, EventsDocument, TypesDocument, UiRouteDoc};
use to_ir::Source;

/// Reads and strictly decodes one JSON document.
pub fn read_document<T: DeserializeOwned>(module: &str, path: &Path) -> Result<T, CodegenError> {
    let raw = fs::read_to_string(path).map_err(|e| CodegenError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| CodegenError::DecodeFailed {
        module: module.to_string(),
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// The decoded documents of one module.
#[derive(Debug, Clone)]
pub struct ModuleDocuments {
    pub id: String,
    pub path: String,
    pub types: Option<(PathBuf, TypesDocument)>,
    pub events: Option<(PathBuf, EventsDocument)>,
    pub commands: Option<(PathBuf, Vec<CommandDoc>)>,
    pub ui_routes: Option<(PathBuf, Vec<UiRouteDoc>)>,
}

fn read_optional<T: DeserializeOwned>(
    module: &str,
    path: Option<&PathBuf>,
) -> Result<Option<(PathBuf, T)>, CodegenError> {
    path.map(|path| Ok((path.clone(), read_document(module, path)?)))
        .transpose()
}

impl ModuleDocuments {
    /// Reads every document the config names. Unnamed documents stay absent.
    pub fn read(config: &ModuleConfig) -> Result<Self, CodegenError> {
        let id = module_id_from_path(&config.path);
        Ok(Self {
            types: read_optional(&id, config.types.as_ref())?,
            events: read_optional(&id, config.events.as_ref())?,
            commands: read_optional(&id, config.commands.as_ref())?,
            ui_routes: read_optional(&id, config.ui_routes.as_ref())?,
            path: config.path.clone(),
            id,
        })
    }

    /// Lowers everything but commands.
    fn lower_declarations(&self) -> Result<Module, CodegenError> {
        let mut module = Module::new(&self.path);
        module.present = SpecPresence {
            types: self.types.is_some(),
            events: self.events.is_some(),
            commands: self.commands.is_some(),
            ui_routes: self.ui_routes.is_some(),
        };

        if let Some((path, doc)) = &self.types {
            module.types = to_ir::lower_types(self.source(path), doc)?;
        }
        if let Some((_, doc)) = &self.events {
            module.events = to_ir::lower_events(&self.id, doc)?;
        }
        if let Some((path, docs)) = &self.ui_routes {
            module.ui_routes = to_ir::lower_ui_routes(self.source(path), docs)?;
        }

        Ok(module)
    }

    fn source<'a>(&'a self, path: &'a Path) -> Source<'a> {
        Source {
            module: &self.id,
            path,
        }
    }
}

/// Loads, lowers and validates every module of a run, in config order.
pub fn load_modules(configs: &[ModuleConfig]) -> Result<Vec<Module>, CodegenError> {
    let documents = configs
        .iter()
        .map(ModuleDocuments::read)
        .collect::<Result<Vec<_>, _>>()?;

    let mut modules = documents
        .iter()
        .map(ModuleDocuments::lower_declarations)
        .collect::<Result<Vec<_>, _>>()?;
    validate::validate_module_ids(&modules)?;

    for (index, docs) in documents.iter().enumerate() {
        if let Some((path, commands)) = &docs.commands {
            let lowered =
                to_ir::lower_commands(docs.source(path), &modules[index], &modules, commands)?;
            modules[index].commands = lowered;
        }
    }

    for module in &modules {
        validate::validate_module(module, &modules)?;
        info!(
            module = %module.id,
            types = module.types.types.len(),
            enums = module.types.enums.len(),
            events = module.events.len(),
            commands = module.commands.len(),
            ui_routes = module.ui_routes.len(),
            "loaded module"
        );
    }

    Ok(modules)
}

impl Module {
    /// Loads a single module on its own. Cross-module references can only be
    /// resolved through [`load_modules`].
    pub fn load(config: &ModuleConfig) -> Result<Self, CodegenError> {
        let mut modules = load_modules(std::slice::from_ref(config))?;
        modules.pop().ok_or_else(|| CodegenError::InvalidConfig {
            path: PathBuf::from(&config.path),
            message: "module produced no output".to_string(),
        })
    }
}
