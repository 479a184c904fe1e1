//! Application state management
//!
//! Tracks the current screen and the back stack, maps keyboard events to
//! input actions, and acts as the navigation host for screen controllers.

use crate::flow::host::{NavigationHost, ScreenRegistry};
use crate::models::{NavigationRequest, ScreenId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

/// Input actions that can be triggered by keyboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Move focus up (arrow up)
    Up,
    /// Move focus down (arrow down)
    Down,
    /// Confirm (Enter)
    Select,
    /// Toggle the focused option (Space)
    Toggle,
    /// Go back (Esc)
    Back,
    /// Next item (Tab)
    Next,
    /// Previous item (Shift+Tab)
    Previous,
    /// Delete the last typed character
    Backspace,
    /// A printable character
    Char(char),
    /// Quit application (Ctrl+C)
    Quit,
    /// No action
    None,
}

/// Screen navigation state and host implementation
#[derive(Debug)]
pub struct StateManager {
    registry: ScreenRegistry,
    current: ScreenId,
    history: Vec<ScreenId>,
    pending: Option<NavigationRequest>,
    should_quit: bool,
}

impl StateManager {
    /// Create a state manager starting at `initial`
    pub fn new(initial: ScreenId, registry: ScreenRegistry) -> Self {
        Self {
            registry,
            current: initial,
            history: Vec::new(),
            pending: None,
            should_quit: false,
        }
    }

    pub fn current_screen(&self) -> ScreenId {
        self.current
    }

    pub fn previous_screen(&self) -> Option<ScreenId> {
        self.history.last().copied()
    }

    pub fn history(&self) -> &[ScreenId] {
        &self.history
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Take the request produced by the last navigation, if any
    ///
    /// Each request is handed out once; the app mounts its destination.
    pub fn take_pending(&mut self) -> Option<NavigationRequest> {
        self.pending.take()
    }

    /// Convert keyboard event to input action
    pub fn key_to_action(key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::Quit
            }
            KeyCode::Up => InputAction::Up,
            KeyCode::Down => InputAction::Down,
            KeyCode::Enter => InputAction::Select,
            KeyCode::Char(' ') => InputAction::Toggle,
            KeyCode::Esc => InputAction::Back,
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    InputAction::Previous
                } else {
                    InputAction::Next
                }
            }
            KeyCode::BackTab => InputAction::Previous,
            KeyCode::Backspace => InputAction::Backspace,
            KeyCode::Char(c) => InputAction::Char(c),
            _ => InputAction::None,
        }
    }
}

impl NavigationHost for StateManager {
    fn navigate(&mut self, request: NavigationRequest) {
        let destination = request.destination();
        if !self.registry.contains(destination) {
            warn!(%destination, "navigation to unregistered screen ignored");
            return;
        }
        // revisiting a screen on the stack unwinds back to it
        if let Some(index) = self.history.iter().position(|id| *id == destination) {
            self.history.truncate(index);
        } else if destination != self.current {
            self.history.push(self.current);
        }
        debug!(from = %self.current, to = %destination, "transition");
        self.current = destination;
        self.pending = Some(request);
    }

    fn go_back(&mut self) {
        match self.history.pop() {
            Some(previous) => {
                debug!(from = %self.current, to = %previous, "back");
                self.current = previous;
                self.pending = Some(NavigationRequest::new(previous));
            }
            None => self.should_quit = true,
        }
    }

    fn registry(&self) -> ScreenRegistry {
        self.registry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> StateManager {
        StateManager::new(ScreenId::Onboarding, ScreenRegistry::all())
    }

    #[test]
    fn test_state_manager_creation() {
        let state_manager = manager();
        assert_eq!(state_manager.current_screen(), ScreenId::Onboarding);
        assert!(!state_manager.should_quit());
        assert!(state_manager.previous_screen().is_none());
    }

    #[test]
    fn test_navigation_pushes_history() {
        let mut state_manager = manager();
        state_manager.navigate(NavigationRequest::new(ScreenId::Login));
        assert_eq!(state_manager.current_screen(), ScreenId::Login);
        assert_eq!(state_manager.previous_screen(), Some(ScreenId::Onboarding));

        state_manager.navigate(NavigationRequest::new(ScreenId::Home));
        assert_eq!(state_manager.history(), &[ScreenId::Onboarding, ScreenId::Login]);
    }

    #[test]
    fn test_cycles_keep_history_bounded() {
        let mut state_manager = StateManager::new(ScreenId::Home, ScreenRegistry::all());
        for _ in 0..50 {
            state_manager.navigate(NavigationRequest::new(ScreenId::ModuleSelect));
            state_manager.navigate(NavigationRequest::new(ScreenId::Lesson));
            state_manager.navigate(NavigationRequest::new(ScreenId::Home));
        }
        assert!(state_manager.history().is_empty());
        assert_eq!(state_manager.current_screen(), ScreenId::Home);

        // back from the unwound root quits instead of replaying the lesson
        state_manager.go_back();
        assert!(state_manager.should_quit());
    }

    #[test]
    fn test_revisit_unwinds_to_earlier_entry() {
        let mut state_manager = manager();
        state_manager.navigate(NavigationRequest::new(ScreenId::Login));
        state_manager.navigate(NavigationRequest::new(ScreenId::Home));
        state_manager.navigate(NavigationRequest::new(ScreenId::ModuleSelect));
        state_manager.navigate(NavigationRequest::new(ScreenId::Login));
        assert_eq!(state_manager.history(), &[ScreenId::Onboarding]);

        state_manager.go_back();
        assert_eq!(state_manager.current_screen(), ScreenId::Onboarding);
    }

    #[test]
    fn test_pending_request_consumed_once() {
        let mut state_manager = manager();
        state_manager.navigate(NavigationRequest::new(ScreenId::Login));
        let request = state_manager.take_pending().unwrap();
        assert_eq!(request.destination(), ScreenId::Login);
        assert!(state_manager.take_pending().is_none());
    }

    #[test]
    fn test_go_back() {
        let mut state_manager = manager();
        state_manager.navigate(NavigationRequest::new(ScreenId::Register));
        state_manager.go_back();
        assert_eq!(state_manager.current_screen(), ScreenId::Onboarding);
        assert!(state_manager.previous_screen().is_none());
        assert!(!state_manager.should_quit());

        // back from the root quits
        state_manager.go_back();
        assert!(state_manager.should_quit());
    }

    #[test]
    fn test_unregistered_destination_ignored() {
        let mut state_manager =
            StateManager::new(ScreenId::Onboarding, ScreenRegistry::new([ScreenId::Onboarding]));
        state_manager.navigate(NavigationRequest::new(ScreenId::Home));
        assert_eq!(state_manager.current_screen(), ScreenId::Onboarding);
        assert!(state_manager.take_pending().is_none());
    }

    #[test]
    fn test_key_to_action() {
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            InputAction::Quit
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            InputAction::Char('q')
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            InputAction::Up
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            InputAction::Select
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)),
            InputAction::Toggle
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            InputAction::Back
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)),
            InputAction::Previous
        );
        assert_eq!(
            StateManager::key_to_action(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)),
            InputAction::Backspace
        );
    }
}
