use crate::common::*;
use std::collections::BTreeSet;

pub const ADMINISTRATOR: &str = "Administrator";

/// Knobs for a [Session](crate::Session). All of them have workable defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Sides used when a code names none.
    pub default_sides: Int,
    /// Return function used when a code with sides names none.
    pub default_return: ReturnFunction,
    /// Dice budget for one top-level roll, explosions and loops included.
    pub max_rolls: Option<usize>,
    pub history_capacity: usize,
    pub backref_capacity: usize,
    /// How deep parentheses and nested rolls may go.
    pub max_depth: usize,
    /// How many defines one resolution may expand.
    pub max_expansions: usize,
    pub permissions: BTreeSet<String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn is_administrator(&self) -> bool {
        self.permissions.contains(ADMINISTRATOR)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_sides: 10,
            default_return: ReturnFunction::None,
            max_rolls: Some(10_000),
            history_capacity: 100,
            backref_capacity: 5,
            max_depth: 100,
            max_expansions: 1000,
            permissions: BTreeSet::new(),
        }
    }
}
