// ── Button domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind};

/// A programmable button on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    #[serde(default)]
    pub index: usize,
    pub action: Action,
    /// Action kinds this button can be mapped to.
    #[serde(default = "ActionKind::all")]
    pub action_types: BTreeSet<ActionKind>,
}

impl Button {
    pub fn accepts(&self, kind: ActionKind) -> bool {
        self.action_types.contains(&kind)
    }
}
