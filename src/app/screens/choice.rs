//! Choice screen
//!
//! Lists the screen's options with a continue control underneath. Up/Down
//! walk the list and the control, Enter or Space picks the focused option
//! and Enter on the control continues. Backspace drops the choice.

use super::{offset_area, render_header, render_help, step_focus, transform_style};
use crate::app::state::InputAction;
use crate::flow::{ContinueOutcome, NavigationHost, ScreenController, SelectionMode};
use crate::util::describe_params;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Instant;

/// View state of a choice screen
#[derive(Debug, Default)]
pub struct ChoiceScreen {
    focus: usize,
    list_state: ListState,
}

impl ChoiceScreen {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            focus: 0,
            list_state,
        }
    }

    /// Focused entry; the option count means the continue control
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn handle<H: NavigationHost + ?Sized>(
        &mut self,
        action: &InputAction,
        controller: &mut ScreenController,
        host: &mut H,
    ) -> Option<ContinueOutcome> {
        let option_count = controller.selection().map_or(0, |s| s.options().len());
        let entries = option_count + 1;

        match action {
            InputAction::Up | InputAction::Previous => {
                self.focus = step_focus(self.focus, entries, false)
            }
            InputAction::Down => self.focus = step_focus(self.focus, entries, true),
            InputAction::Next => self.focus = option_count,
            InputAction::Select | InputAction::Toggle if self.focus < option_count => {
                controller.choose_index(self.focus);
            }
            InputAction::Select => return Some(controller.submit(host)),
            InputAction::Backspace => controller.clear_selection(),
            _ => {}
        }
        None
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, controller: &ScreenController, now: Instant) {
        let intro = controller.intro_transform(now);
        let style = transform_style(&intro);
        let content = offset_area(area, &intro, area);

        let params = describe_params(controller.params());
        let params_height = if params.is_empty() {
            0
        } else {
            params.len() as u16 + 2
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),             // Title and subtitle
                Constraint::Length(params_height), // Choices carried in
                Constraint::Min(4),                // Options
                Constraint::Length(3),             // Continue
                Constraint::Length(3),             // Help
            ])
            .split(content);

        render_header(f, chunks[0], controller, style);
        if !params.is_empty() {
            self.render_params(f, chunks[1], &params, style);
        }
        self.render_options(f, chunks[2], controller, style);
        self.render_continue(f, chunks[3], controller, style);
        render_help(
            f,
            chunks[4],
            &[
                ("↑↓", "Navigate"),
                ("Enter", "Select"),
                ("Tab", "Continue"),
                ("Bksp", "Clear"),
                ("Esc", "Back"),
                ("Q", "Quit"),
            ],
        );
    }

    fn render_params(&self, f: &mut Frame, area: Rect, params: &[String], style: Style) {
        let lines: Vec<Line> = params.iter().map(|p| Line::from(p.clone())).collect();
        let block = Paragraph::new(lines).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Your choices"),
        );
        f.render_widget(block, area);
    }

    fn render_options(&mut self, f: &mut Frame, area: Rect, controller: &ScreenController, style: Style) {
        let Some(selection) = controller.selection() else {
            return;
        };

        let items: Vec<ListItem> = selection
            .options()
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let chosen = selection.is_index_selected(index);
                let marker = match (selection.mode(), chosen) {
                    (SelectionMode::Single, true) => "(•) ",
                    (SelectionMode::Single, false) => "( ) ",
                    (SelectionMode::Multi, true) => "[x] ",
                    (SelectionMode::Multi, false) => "[ ] ",
                };
                if option.is_enabled() {
                    let label_style = if chosen {
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(marker),
                        Span::styled(option.label.clone(), label_style),
                    ]))
                } else {
                    ListItem::new(Line::from(vec![
                        Span::raw(marker),
                        Span::raw(option.label.clone()),
                        Span::raw(" (coming soon)"),
                    ]))
                    .style(Style::default().fg(Color::DarkGray))
                }
            })
            .collect();

        let title = match selection.mode() {
            SelectionMode::Single => "Choose one",
            SelectionMode::Multi => "Choose any",
        };
        let list = List::new(items)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .highlight_symbol(">> ");

        let option_count = selection.options().len();
        self.list_state
            .select((self.focus < option_count).then_some(self.focus));
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_continue(&self, f: &mut Frame, area: Rect, controller: &ScreenController, style: Style) {
        let focused = controller
            .selection()
            .is_some_and(|s| self.focus == s.options().len());
        let button_style = match (controller.continue_enabled(), focused) {
            (true, true) => Style::default().bg(Color::Cyan).fg(Color::Black),
            (true, false) => Style::default().fg(Color::Cyan),
            (false, _) => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        };

        let button = Paragraph::new("Continue")
            .style(button_style.patch(style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(button_style));
        f.render_widget(button, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenCatalog;
    use crate::flow::{AnimationSettings, RecordingHost};
    use crate::models::ScreenId;
    use serde_json::Map;

    fn mount(id: ScreenId) -> ScreenController {
        let catalog = ScreenCatalog::builtin();
        ScreenController::mount(catalog.get(id).unwrap(), Map::new(), &AnimationSettings::default())
    }

    #[test]
    fn test_focus_wraps_through_continue() {
        let mut controller = mount(ScreenId::Onboarding);
        let mut host = RecordingHost::default();
        let mut screen = ChoiceScreen::new();

        screen.handle(&InputAction::Up, &mut controller, &mut host);
        assert_eq!(screen.focus(), 2);
        screen.handle(&InputAction::Down, &mut controller, &mut host);
        assert_eq!(screen.focus(), 0);
    }

    #[test]
    fn test_select_then_continue() {
        let mut controller = mount(ScreenId::Onboarding);
        let mut host = RecordingHost::default();
        let mut screen = ChoiceScreen::new();

        assert_eq!(screen.handle(&InputAction::Select, &mut controller, &mut host), None);
        assert!(controller.continue_enabled());

        screen.handle(&InputAction::Next, &mut controller, &mut host);
        assert_eq!(
            screen.handle(&InputAction::Select, &mut controller, &mut host),
            Some(ContinueOutcome::Navigated(ScreenId::Register))
        );
        assert_eq!(host.requests.len(), 1);
    }

    #[test]
    fn test_continue_blocked_without_selection() {
        let mut controller = mount(ScreenId::Onboarding);
        let mut host = RecordingHost::default();
        let mut screen = ChoiceScreen::new();

        screen.handle(&InputAction::Next, &mut controller, &mut host);
        assert_eq!(
            screen.handle(&InputAction::Select, &mut controller, &mut host),
            Some(ContinueOutcome::Blocked)
        );
        assert!(host.requests.is_empty());
    }

    #[test]
    fn test_backspace_clears_single_choice() {
        let mut controller = mount(ScreenId::Onboarding);
        let mut host = RecordingHost::default();
        let mut screen = ChoiceScreen::new();

        screen.handle(&InputAction::Select, &mut controller, &mut host);
        assert!(controller.continue_enabled());
        screen.handle(&InputAction::Backspace, &mut controller, &mut host);
        assert!(controller.selection().unwrap().current().is_none());

        screen.handle(&InputAction::Next, &mut controller, &mut host);
        assert_eq!(
            screen.handle(&InputAction::Select, &mut controller, &mut host),
            Some(ContinueOutcome::Blocked)
        );
        assert!(host.requests.is_empty());
    }

    #[test]
    fn test_space_toggles_on_multi_choice() {
        let mut controller = mount(ScreenId::VocabularyCategories);
        let mut host = RecordingHost::default();
        let mut screen = ChoiceScreen::new();

        screen.handle(&InputAction::Toggle, &mut controller, &mut host);
        assert!(controller.selection().unwrap().is_index_selected(0));
        screen.handle(&InputAction::Toggle, &mut controller, &mut host);
        assert!(!controller.selection().unwrap().is_index_selected(0));
    }
}
