//! Data models module
//!
//! Contains screen identifiers, selectable options and the navigation
//! requests exchanged with the navigation host.

pub mod option;
pub mod request;
pub mod screen;

// Re-export commonly used types
pub use option::{ChoiceOption, OptionId};
pub use request::NavigationRequest;
pub use screen::ScreenId;
