//! Selection-and-navigation flow
//!
//! UI-agnostic core shared by every screen: validation rules, selection
//! tracking, the continue gate, declarative transitions and the controller
//! composing them. Rendering lives in [`crate::app`].

pub mod animator;
pub mod controller;
pub mod gate;
pub mod host;
pub mod selection;
pub mod validation;

pub use animator::{AnimationPlayer, Keyframe, Transform, Transition};
pub use controller::{AnimationSettings, ContinueOutcome, FormState, ScreenBody, ScreenController};
pub use gate::{GatePolicy, NavigationGate, NoSelectionPolicy};
pub use host::{NavigationHost, RecordingHost, ScreenRegistry};
pub use selection::{Selected, SelectionMode, SelectionState};
pub use validation::{validate, FieldError, FieldName, FormFields, FormKind, FormRules, ValidationResult};
