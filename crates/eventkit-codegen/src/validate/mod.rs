//! Validation of lowered modules.

mod references;
mod structure;

use crate::diagnostic::CodegenError;
use crate::ir::Module;

pub use structure::validate_module_ids;

/// Validates a module against every module of the run.
pub fn validate_module(module: &Module, registry: &[Module]) -> Result<(), CodegenError> {
    // names first, so later passes can rely on uniqueness
    structure::validate_structure(module)?;

    references::validate_references(module, registry)?;
    references::validate_commands(module)?;

    Ok(())
}
