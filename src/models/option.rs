//! Selectable options

use super::ScreenId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an option, unique within its screen
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OptionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One selectable choice presented on a screen
///
/// Options are declared once in the screen catalog and never mutated.
/// An option without a destination (a "coming soon" module, for instance)
/// is rendered disabled and can never become the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: OptionId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<ScreenId>,
    /// Opaque data forwarded to the destination screen
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, destination: Option<ScreenId>) -> Self {
        Self {
            id: OptionId::new(id),
            label: label.into(),
            destination,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.destination.is_some()
    }
}
