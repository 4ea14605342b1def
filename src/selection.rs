//! Bookkeeping for confirming which detected classes to keep.
//!
//! Each class is offered for confirmation once, the first time it is the top
//! detection of a frame. The caller then records an accept or reject answer.

use std::collections::HashSet;

use crate::pipeline::Outcome;

/// Offered, accepted and rejected class names for one session.
#[derive(Clone, Debug, Default)]
pub struct ClassSelection {
    offered: HashSet<String>,
    accepted: Vec<String>,
    rejected: Vec<String>,
}

impl ClassSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the top detection's class name if it has not been offered yet.
    ///
    /// Frames without detections, and classes already offered, yield `None`.
    pub fn offer(&mut self, outcome: &Outcome) -> Option<String> {
        let name = &outcome.best()?.class_name;
        if self.offered.contains(name) {
            return None;
        }
        self.offered.insert(name.clone());
        Some(name.clone())
    }

    /// Records that the user kept `name`.
    pub fn accept(&mut self, name: &str) {
        self.offered.insert(name.to_owned());
        self.rejected.retain(|n| n != name);
        if !self.accepted.iter().any(|n| n == name) {
            self.accepted.push(name.to_owned());
        }
    }

    /// Records that the user declined `name`.
    pub fn reject(&mut self, name: &str) {
        self.offered.insert(name.to_owned());
        self.accepted.retain(|n| n != name);
        if !self.rejected.iter().any(|n| n == name) {
            self.rejected.push(name.to_owned());
        }
    }

    /// Accepted classes in the order they were accepted.
    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Returns `true` once `name` has an accept or reject answer.
    pub fn is_decided(&self, name: &str) -> bool {
        self.accepted.iter().chain(&self.rejected).any(|n| n == name)
    }
}
