//! # eventkit code generator
//!
//! Generates Go backend code, TypeScript frontend code and Markdown docs from
//! declarative JSON specs of types, events, commands, REST endpoints and UI
//! routes.
//!
//! ## Architecture
//!
//! ```text
//! Spec documents (JSON)
//!        │
//!        ▼
//! ┌──────────────┐
//! │     Spec     │  Strict decoding, lowering
//! │ (JSON → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Uniqueness, references, type mapping
//! │    (IR)      │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Context per module, templates rendered in memory
//! │ (IR → text)  │
//! └──────┬───────┘
//!        │
//!        ▼
//!   atomic publish
//! ```
//!
//! Every module of a run is loaded and validated before the first file is
//! written. Modules are then generated one after another.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eventkit_codegen::{CodegenConfig, Generator};
//!
//! let config = CodegenConfig::load("codegen.json".as_ref())?;
//! let result = Generator::new(config).generate()?;
//! println!("{} files", result.files.len());
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod ir;
pub mod spec;
pub mod validate;

use std::path::PathBuf;

use tracing::{debug, info, warn};

pub use codegen::render::{Renderer, StandardHelpers, TemplateHelpers};
pub use config::{CodegenConfig, ModuleConfig};
pub use diagnostic::{CodegenError, ErrorCategory};

/// Runs the whole pipeline for a configuration.
#[derive(Debug)]
pub struct Generator {
    config: CodegenConfig,
    renderer: Renderer,
}

impl Generator {
    /// Creates a generator with the stock template helpers.
    pub fn new(config: CodegenConfig) -> Self {
        Self::with_renderer(config, Renderer::default())
    }

    pub fn with_renderer(config: CodegenConfig, renderer: Renderer) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Loads and validates every module without generating anything.
    pub fn check(&self) -> Result<Vec<ir::Module>, CodegenError> {
        spec::load_modules(&self.config.modules)
    }

    /// Loads every module, then renders and publishes each in turn.
    ///
    /// Each file is published atomically on its own; a module's file set is
    /// not. The first error aborts the run, and files already published stay
    /// in place, including earlier files of the module that failed. A file
    /// whose publication failed keeps its previous content.
    pub fn generate(&self) -> Result<GenerateResult, CodegenError> {
        let modules = self.check()?;
        let mut result = GenerateResult::default();

        for module in &modules {
            if !module.present.any() {
                warn!(module = %module.id, "module declares no specs, nothing to generate");
                continue;
            }

            let generated = codegen::generate(module, &modules, &self.config, &self.renderer)?;

            for file in &generated.files {
                let path = self.config.out_dir.join(&file.path);
                codegen::render::publish(&path, &file.content)?;
                debug!(path = %path.display(), bytes = file.content.len(), "published");
                result.files.push(path);
            }

            info!(
                module = %module.id,
                files = generated.files.len(),
                "generated module"
            );
            result.modules += 1;
        }

        Ok(result)
    }
}

/// Result of a successful run.
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// Number of modules that produced output.
    pub modules: usize,
    /// Every published file, in publication order.
    pub files: Vec<PathBuf>,
}
