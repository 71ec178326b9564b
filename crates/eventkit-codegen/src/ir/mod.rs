//! Language-agnostic intermediate representation.
//!
//! Spec documents are lowered into these types by the loader and consumed by
//! the code generators. Every custom type name has already been classified and
//! resolved by the time it lands here.

mod command;
mod datatype;
mod event;
mod module;
mod route;
mod types;

pub use command::{CommandFieldSpec, CommandSpec, CrudNature, CustomType, FieldType};
pub use datatype::{
    flatten_all, is_custom_type, unique_module_ids, DatatypeDef, Primitive, PrimitiveFlags,
    TypeKind, TypeRef,
};
pub use event::{EventDef, EventField};
pub use module::{module_id_from_path, Module, ModuleRegistry, ReferenceTarget, SpecPresence};
pub use route::{PathTemplate, QueryParamSpec, QueryParamType, UiRouteSpec};
pub use types::{EndpointSpec, EnumDef, HttpMethod, NamedType, StringConst, TypesFile};
