//! String-backed enums: member constants, parsing and the exhaustiveness digest.
//!
//! Go has no exhaustive matching over string enums. Every generated enum gets an
//! identity function named `<Enum>Exhaustive<digest>`; hand-written switches call
//! it, so any change to the member list renames the function and breaks the
//! build at every switch that needs review.

use convert_case::{Case, Casing};
use serde::Serialize;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::ir::EnumDef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumParseError {
    #[error("invalid {enum_name} member: {value}")]
    InvalidEnumValue { enum_name: String, value: String },
}

/// An enum member with its derived identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedMember {
    /// PascalCase of the raw value.
    pub key: String,
    /// `<Enum><Key>`
    pub go_const: String,
    pub value: String,
}

/// An enum ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedEnum {
    pub name: String,
    pub members: Vec<ProcessedMember>,
    pub digest: String,
}

/// `"in_progress"` => `"InProgress"`
pub fn member_key(value: &str) -> String {
    value.to_case(Case::Pascal)
}

/// 16 lowercase hex chars over the ordered `(key, value)` pairs.
pub fn members_digest<'a>(members: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut buf = Vec::new();
    for (key, value) in members {
        buf.extend_from_slice(key.as_bytes());
        buf.push(0);
        buf.extend_from_slice(value.as_bytes());
        buf.push(0);
    }
    format!("{:016x}", xxh3_64(&buf))
}

impl ProcessedEnum {
    pub fn process(def: &EnumDef) -> Self {
        let members: Vec<ProcessedMember> = def
            .members
            .iter()
            .map(|value| {
                let key = member_key(value);
                ProcessedMember {
                    go_const: format!("{}{}", def.name, key),
                    key,
                    value: value.clone(),
                }
            })
            .collect();

        let digest = members_digest(
            members
                .iter()
                .map(|m| (m.key.as_str(), m.value.as_str())),
        );

        Self {
            name: def.name.clone(),
            members,
            digest,
        }
    }

    /// `<Enum>Exhaustive<digest>`
    pub fn exhaustive_ident(&self) -> String {
        format!("{}Exhaustive{}", self.name, self.digest)
    }

    /// First member whose raw value equals `raw`, in declaration order.
    pub fn parse(&self, raw: &str) -> Result<&ProcessedMember, EnumParseError> {
        self.members
            .iter()
            .find(|m| m.value == raw)
            .ok_or_else(|| EnumParseError::InvalidEnumValue {
                enum_name: self.name.clone(),
                value: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_def(members: &[&str]) -> EnumDef {
        EnumDef {
            name: "Status".to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_member_keys() {
        let processed = ProcessedEnum::process(&enum_def(&["active", "in_progress"]));
        let consts: Vec<&str> = processed.members.iter().map(|m| m.go_const.as_str()).collect();
        assert_eq!(consts, vec!["StatusActive", "StatusInProgress"]);
    }

    #[test]
    fn test_digest_is_stable() {
        let a = ProcessedEnum::process(&enum_def(&["active", "closed"]));
        let b = ProcessedEnum::process(&enum_def(&["active", "closed"]));
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.digest.len(), 16);
        assert!(a.digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(a.exhaustive_ident(), format!("StatusExhaustive{}", a.digest));
    }

    #[test]
    fn test_digest_changes_with_membership_and_order() {
        let base = ProcessedEnum::process(&enum_def(&["active", "closed"])).digest;
        let reordered = ProcessedEnum::process(&enum_def(&["closed", "active"])).digest;
        let added = ProcessedEnum::process(&enum_def(&["active", "closed", "archived"])).digest;
        let removed = ProcessedEnum::process(&enum_def(&["active"])).digest;

        assert_ne!(base, reordered);
        assert_ne!(base, added);
        assert_ne!(base, removed);
    }

    #[test]
    fn test_parse() {
        let processed = ProcessedEnum::process(&enum_def(&["active", "closed"]));
        assert_eq!(processed.parse("closed").unwrap().go_const, "StatusClosed");
        assert_eq!(
            processed.parse("Closed"),
            Err(EnumParseError::InvalidEnumValue {
                enum_name: "Status".to_string(),
                value: "Closed".to_string()
            })
        );
    }
}
