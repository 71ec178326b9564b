//! The module aggregate: everything one logical module declares.

use super::{CommandSpec, EventDef, TypeRef, TypesFile, UiRouteSpec};

/// Which spec documents a module declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecPresence {
    pub types: bool,
    pub events: bool,
    pub commands: bool,
    pub ui_routes: bool,
}

impl SpecPresence {
    pub fn any(&self) -> bool {
        self.types || self.events || self.commands || self.ui_routes
    }
}

/// What a custom reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTarget {
    Enum,
    Struct,
}

/// A loaded and validated module. Missing documents are empty placeholders.
#[derive(Debug, Clone)]
pub struct Module {
    /// Last segment of `path`, e.g. `usertypes`.
    pub id: String,
    /// e.g. `server/usertypes`.
    pub path: String,
    pub present: SpecPresence,
    pub types: TypesFile,
    pub events: Vec<EventDef>,
    pub commands: Vec<CommandSpec>,
    pub ui_routes: Vec<UiRouteSpec>,
}

impl Module {
    /// Creates an empty module for the given path.
    pub fn new(path: &str) -> Self {
        Self {
            id: module_id_from_path(path),
            path: path.to_string(),
            present: SpecPresence::default(),
            types: TypesFile::default(),
            events: Vec::new(),
            commands: Vec::new(),
            ui_routes: Vec::new(),
        }
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.types.enum_by_name(name).is_some()
    }

    /// Resolves a local (unqualified) name against this module's declarations.
    pub fn resolve_local(&self, name: &str) -> Option<ReferenceTarget> {
        if self.has_enum(name) {
            Some(ReferenceTarget::Enum)
        } else if self.types.type_by_name(name).is_some() {
            Some(ReferenceTarget::Struct)
        } else {
            None
        }
    }

    pub fn has_rest_endpoints(&self) -> bool {
        !self.types.endpoints.is_empty()
    }
}

/// Looks up declarations of every module in the run, for cross-module references.
pub trait ModuleRegistry {
    fn resolve(&self, type_ref: &TypeRef) -> Option<ReferenceTarget>;

    /// Path of the module with the given id.
    fn module_path(&self, module_id: &str) -> Option<&str>;
}

impl ModuleRegistry for [Module] {
    fn resolve(&self, type_ref: &TypeRef) -> Option<ReferenceTarget> {
        let module_id = type_ref.module.as_deref()?;
        self.iter()
            .find(|m| m.id == module_id)
            .and_then(|m| m.resolve_local(&type_ref.name))
    }

    fn module_path(&self, module_id: &str) -> Option<&str> {
        self.iter()
            .find(|m| m.id == module_id)
            .map(|m| m.path.as_str())
    }
}

/// `server/usertypes` => `usertypes`
pub fn module_id_from_path(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumDef, NamedType, DatatypeDef, Primitive};

    #[test]
    fn test_module_id_from_path() {
        assert_eq!(module_id_from_path("server/usertypes"), "usertypes");
        assert_eq!(module_id_from_path("usertypes"), "usertypes");
        assert_eq!(module_id_from_path("a/b/c/"), "c");
    }

    #[test]
    fn test_resolve() {
        let mut module = Module::new("app/accounts");
        module.types.enums.push(EnumDef {
            name: "Role".to_string(),
            members: vec!["admin".to_string()],
        });
        module.types.types.push(NamedType {
            name: "Account".to_string(),
            datatype: DatatypeDef::object(vec![(
                "id".to_string(),
                DatatypeDef::primitive(Primitive::String),
            )]),
        });

        assert_eq!(module.resolve_local("Role"), Some(ReferenceTarget::Enum));
        assert_eq!(module.resolve_local("Account"), Some(ReferenceTarget::Struct));
        assert_eq!(module.resolve_local("Missing"), None);

        let modules = vec![module];
        let qualified = TypeRef::parse("accounts.Role").unwrap();
        assert_eq!(modules.resolve(&qualified), Some(ReferenceTarget::Enum));
        let unknown_module = TypeRef::parse("billing.Role").unwrap();
        assert_eq!(modules.resolve(&unknown_module), None);
        assert_eq!(modules.module_path("accounts"), Some("app/accounts"));
    }
}
