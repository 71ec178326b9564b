//! Template sources, one constant per generated file kind.
//!
//! Every template renders against a [`ModuleContext`](super::ModuleContext).

pub mod backend;
pub mod docs;
pub mod frontend;
