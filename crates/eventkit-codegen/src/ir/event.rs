//! Event IR.

use super::DatatypeDef;

/// A field of an event.
#[derive(Debug, Clone)]
pub struct EventField {
    pub key: String,
    pub datatype: DatatypeDef,
    pub notes: String,
}

/// An event declaration. Timestamp and acting user are implicit metadata and
/// never appear in `fields`.
#[derive(Debug, Clone)]
pub struct EventDef {
    /// Dotted key, e.g. `user.Created`.
    pub event: String,
    pub fields: Vec<EventField>,
    pub changelog: Vec<String>,
}
