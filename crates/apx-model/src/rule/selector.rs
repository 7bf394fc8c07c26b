use std::fmt;

use crate::domain::WILDCARD;

/// Matches either one concrete name or anything.
///
/// Parsed from configuration where the literal [`WILDCARD`] (`"all"`) means [`Selector::Any`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Matches exactly this name.
    Exact(String),
    /// Matches every name.
    Any,
}

impl Selector {
    /// Interpret a configured value.
    pub fn parse(value: &str) -> Self {
        if value == WILDCARD {
            Selector::Any
        } else {
            Selector::Exact(value.to_string())
        }
    }

    /// Returns `true` if `name` is selected.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Selector::Exact(expected) => expected == name,
            Selector::Any => true,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Exact(name) => f.write_str(name),
            Selector::Any => f.write_str(WILDCARD),
        }
    }
}
