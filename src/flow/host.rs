//! Navigation host seam
//!
//! The host owns the actual screen transitions. Controllers only hand it
//! requests; from their side `navigate` always succeeds.

use crate::models::{NavigationRequest, ScreenId};
use std::collections::BTreeSet;

/// External routing subsystem
pub trait NavigationHost {
    /// Move to the requested screen
    fn navigate(&mut self, request: NavigationRequest);

    /// Return to the previous screen
    fn go_back(&mut self);

    /// Screens this host can show
    fn registry(&self) -> ScreenRegistry;
}

/// Set of screens a host knows how to render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenRegistry {
    screens: BTreeSet<ScreenId>,
}

impl ScreenRegistry {
    pub fn new(screens: impl IntoIterator<Item = ScreenId>) -> Self {
        Self {
            screens: screens.into_iter().collect(),
        }
    }

    /// Registry containing every known screen
    pub fn all() -> Self {
        Self::new(ScreenId::ALL)
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.screens.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ScreenId> + '_ {
        self.screens.iter().copied()
    }
}

/// Host that records requests instead of acting on them
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub requests: Vec<NavigationRequest>,
    pub back_count: usize,
}

impl NavigationHost for RecordingHost {
    fn navigate(&mut self, request: NavigationRequest) {
        self.requests.push(request);
    }

    fn go_back(&mut self) {
        self.back_count += 1;
    }

    fn registry(&self) -> ScreenRegistry {
        ScreenRegistry::all()
    }
}
