//! ID prefix constants.
//!
//! IDs have the form `{prefix}-{8 hex chars}` and are generated by the
//! database (`AegisDb::generate_id`).

pub const PREFIX_FRAMEWORK: &str = "fwk";
pub const PREFIX_CLAUSE: &str = "cls";
pub const PREFIX_CONTROL: &str = "ctl";
pub const PREFIX_ASSESSMENT: &str = "asm";
pub const PREFIX_RESPONSE: &str = "rsp";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_FRAMEWORK,
    PREFIX_CLAUSE,
    PREFIX_CONTROL,
    PREFIX_ASSESSMENT,
    PREFIX_RESPONSE,
];

/// Split an ID into its prefix and random part.
#[must_use]
pub fn split_id(id: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = id.split_once('-')?;
    if prefix.is_empty() || rest.is_empty() {
        return None;
    }
    Some((prefix, rest))
}
