//! TUI application module
//!
//! Contains the terminal user interface components, screen management,
//! and application state handling.

pub mod app;
pub mod screens;
pub mod state;
pub mod tui;

pub use app::{App, Session};
pub use screens::{ChoiceScreen, FormScreen, ScreenView};
pub use state::{InputAction, StateManager};
pub use tui::Tui;
