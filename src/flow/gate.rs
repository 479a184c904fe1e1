//! Continue gating
//!
//! Decides whether a screen's continue action is allowed and which screen
//! it leads to. Two policies exist: selection-required screens route by the
//! chosen option, form-required screens route to one fixed destination once
//! the form validates.

use super::selection::{Selected, SelectionState};
use super::validation::ValidationResult;
use crate::models::{NavigationRequest, ScreenId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// What continue does when nothing is selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSelectionPolicy {
    /// Continue stays disabled
    #[default]
    Block,
    /// Continue routes to a default screen
    Fallback(ScreenId),
}

/// Gate policy of one screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    SelectionRequired { on_no_selection: NoSelectionPolicy },
    FormRequired { destination: ScreenId },
}

/// Continue gate for one screen
#[derive(Debug, Clone, Copy)]
pub struct NavigationGate {
    policy: GatePolicy,
}

impl NavigationGate {
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    pub fn selection_required(on_no_selection: NoSelectionPolicy) -> Self {
        Self::new(GatePolicy::SelectionRequired { on_no_selection })
    }

    pub fn form_required(destination: ScreenId) -> Self {
        Self::new(GatePolicy::FormRequired { destination })
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Whether continue is currently permitted
    ///
    /// Selection-required gates look only at `selection`, form-required gates
    /// only at `validation`. A missing input counts as "nothing chosen" or
    /// "not validated yet" respectively.
    pub fn can_continue(
        &self,
        selection: Option<&SelectionState>,
        validation: Option<&ValidationResult>,
    ) -> bool {
        match self.policy {
            GatePolicy::SelectionRequired { on_no_selection } => {
                let has_selection = selection.map(|s| !s.current().is_none()).unwrap_or(false);
                has_selection || matches!(on_no_selection, NoSelectionPolicy::Fallback(_))
            }
            GatePolicy::FormRequired { .. } => validation.map(|v| v.valid()).unwrap_or(false),
        }
    }

    /// Destination continue would lead to, ignoring validity
    pub fn resolve_destination(&self, selection: Option<&SelectionState>) -> Option<ScreenId> {
        match self.policy {
            GatePolicy::FormRequired { destination } => Some(destination),
            GatePolicy::SelectionRequired { on_no_selection } => {
                let chosen = selection
                    .map(|s| s.current())
                    .unwrap_or(Selected::None)
                    .options()
                    .into_iter()
                    .find_map(|option| option.destination);
                match (chosen, on_no_selection) {
                    (Some(destination), _) => Some(destination),
                    (None, NoSelectionPolicy::Fallback(fallback)) => Some(fallback),
                    (None, NoSelectionPolicy::Block) => None,
                }
            }
        }
    }

    /// Build the navigation request for a confirmed continue
    ///
    /// Returns `None` when continue is not permitted. `extra` is merged into
    /// the parameters, which otherwise carry the chosen option ids and their
    /// metadata.
    pub fn request(
        &self,
        selection: Option<&SelectionState>,
        validation: Option<&ValidationResult>,
        extra: Map<String, Value>,
    ) -> Option<NavigationRequest> {
        if !self.can_continue(selection, validation) {
            debug!(policy = ?self.policy, "continue blocked");
            return None;
        }
        let destination = self.resolve_destination(selection)?;

        let mut params = Map::new();
        if let Some(selection) = selection {
            let chosen = selection.current().options();
            if !chosen.is_empty() {
                params.insert(
                    "selected".to_string(),
                    Value::Array(
                        chosen
                            .iter()
                            .map(|o| Value::String(o.id.as_str().to_string()))
                            .collect(),
                    ),
                );
                params.insert(
                    "metadata".to_string(),
                    Value::Array(chosen.iter().map(|o| o.metadata.clone()).collect()),
                );
            }
        }
        params.extend(extra);

        debug!(%destination, "continue permitted");
        Some(NavigationRequest::with_params(destination, params))
    }
}
