//! Navigation requests handed to the navigation host

use super::ScreenId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A request to move to another screen
///
/// Built by the navigation gate and consumed exactly once by the host.
/// Fields are private so nothing can change a request after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    destination: ScreenId,
    #[serde(default)]
    params: Map<String, Value>,
}

impl NavigationRequest {
    pub fn new(destination: ScreenId) -> Self {
        Self {
            destination,
            params: Map::new(),
        }
    }

    pub fn with_params(destination: ScreenId, params: Map<String, Value>) -> Self {
        Self {
            destination,
            params,
        }
    }

    pub fn destination(&self) -> ScreenId {
        self.destination
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Consume the request, yielding its parameters
    pub fn into_params(self) -> Map<String, Value> {
        self.params
    }
}
