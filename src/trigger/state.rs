use crate::common::Int;

/// The last `project` trigger's run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectRecord {
    pub iterations: usize,
    pub total: Int,
    pub goal: Int,
    pub log: Vec<String>,
}

/// Flags and scratch values left behind by triggers. Nothing resets them but [TriggerState::reset].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerState {
    pub(crate) max: Option<Int>,
    pub(crate) shift: Option<Int>,
    pub(crate) limitbreak: bool,
    pub(crate) rights_violation: bool,
    pub(crate) ignore: bool,
    pub(crate) verbose: bool,
    pub(crate) project: Option<ProjectRecord>,
}

impl TriggerState {
    /// Cap on `project` iterations set by `&max N&`.
    pub fn max(&self) -> Option<Int> {
        self.max
    }

    pub fn shift(&self) -> Option<Int> {
        self.shift
    }

    pub fn limitbreak(&self) -> bool {
        self.limitbreak
    }

    /// Someone without the rights asked for `limitbreak`.
    pub fn rights_violation(&self) -> bool {
        self.rights_violation
    }

    pub fn ignore(&self) -> bool {
        self.ignore
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn project(&self) -> Option<&ProjectRecord> {
        self.project.as_ref()
    }

    pub fn set_ignore(&mut self, on: bool) {
        self.ignore = on;
    }

    pub fn set_verbose(&mut self, on: bool) {
        self.verbose = on;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
