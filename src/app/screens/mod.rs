//! TUI screen components
//!
//! Every catalog entry renders through one of two views: a list of choices
//! or a form. [`ScreenView`] pairs the mounted controller with the view
//! that draws it and routes input between them.

pub mod choice;
pub mod form;

pub use choice::ChoiceScreen;
pub use form::FormScreen;

use crate::app::state::InputAction;
use crate::config::ScreenSpec;
use crate::flow::{
    AnimationSettings, ContinueOutcome, NavigationHost, ScreenBody, ScreenController, Transform,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::{Map, Value};
use std::time::Instant;

/// Mounted screen together with its view state
#[derive(Debug)]
pub struct ScreenView {
    controller: ScreenController,
    widget: Widget,
}

#[derive(Debug)]
enum Widget {
    Choice(ChoiceScreen),
    Form(FormScreen),
}

impl ScreenView {
    pub fn mount(spec: &ScreenSpec, params: Map<String, Value>, animations: &AnimationSettings) -> Self {
        let controller = ScreenController::mount(spec, params, animations);
        let widget = match controller.body() {
            ScreenBody::Choice(_) => Widget::Choice(ChoiceScreen::new()),
            ScreenBody::Form(_) => Widget::Form(FormScreen::new()),
        };
        Self { controller, widget }
    }

    pub fn controller(&self) -> &ScreenController {
        &self.controller
    }

    /// Whether printable keys go into a text field
    pub fn accepts_text(&self) -> bool {
        matches!(self.widget, Widget::Form(_))
    }

    /// Focused entry of the view
    pub fn focus(&self) -> usize {
        match &self.widget {
            Widget::Choice(screen) => screen.focus(),
            Widget::Form(screen) => screen.focus(),
        }
    }

    /// Route an input action; returns the outcome of continue or link actions
    pub fn handle<H: NavigationHost + ?Sized>(
        &mut self,
        action: &InputAction,
        host: &mut H,
    ) -> Option<ContinueOutcome> {
        if *action == InputAction::Back {
            self.controller.back(host);
            return None;
        }
        match &mut self.widget {
            Widget::Choice(screen) => screen.handle(action, &mut self.controller, host),
            Widget::Form(screen) => screen.handle(action, &mut self.controller, host),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.controller.tick(now);
    }

    pub fn render(&mut self, f: &mut Frame, now: Instant) {
        let area = f.size();
        match &mut self.widget {
            Widget::Choice(screen) => screen.render(f, area, &self.controller, now),
            Widget::Form(screen) => screen.render(f, area, &self.controller, now),
        }
    }
}

/// Shift `area` by a transform's offsets, clipped to `bounds`
pub(crate) fn offset_area(area: Rect, transform: &Transform, bounds: Rect) -> Rect {
    let dx = transform.offset_x.round() as i32;
    let dy = transform.offset_y.round() as i32;
    let x = (i32::from(area.x) + dx).clamp(i32::from(bounds.x), i32::from(bounds.right())) as u16;
    let y = (i32::from(area.y) + dy).clamp(i32::from(bounds.y), i32::from(bounds.bottom())) as u16;
    Rect::new(x, y, area.width, area.height).intersection(bounds)
}

/// Base style for content under a transform; faded content is dimmed
pub(crate) fn transform_style(transform: &Transform) -> Style {
    if transform.opacity < 0.6 {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

/// Title and subtitle header shared by both views
pub(crate) fn render_header(f: &mut Frame, area: Rect, controller: &ScreenController, style: Style) {
    let title = Paragraph::new(controller.title().to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
                .patch(style),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    let title_area = Rect::new(area.x, area.y, area.width, area.height.min(3));
    f.render_widget(title, title_area);

    if area.height > 3 && !controller.subtitle().is_empty() {
        let subtitle = Paragraph::new(controller.subtitle().to_string())
            .style(Style::default().fg(Color::White).patch(style))
            .alignment(Alignment::Center);
        f.render_widget(subtitle, Rect::new(area.x, area.y + 3, area.width, area.height - 3));
    }
}

/// Key hints footer
pub(crate) fn render_help(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, what)| {
            [
                Span::styled(key.to_string(), key_style),
                Span::raw(format!(" {}  ", what)),
            ]
        })
        .collect();

    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(help, area);
}

/// Move `focus` one step through `count` entries, wrapping at both ends
pub(crate) fn step_focus(focus: usize, count: usize, forward: bool) -> usize {
    if count == 0 {
        return 0;
    }
    if forward {
        (focus + 1) % count
    } else if focus == 0 {
        count - 1
    } else {
        focus - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_focus_wraps() {
        assert_eq!(step_focus(0, 3, false), 2);
        assert_eq!(step_focus(2, 3, true), 0);
        assert_eq!(step_focus(1, 3, true), 2);
        assert_eq!(step_focus(0, 0, true), 0);
    }

    #[test]
    fn test_offset_area_is_clipped() {
        let bounds = Rect::new(0, 0, 20, 10);
        let shifted = offset_area(
            Rect::new(0, 0, 20, 3),
            &Transform {
                offset_x: -2.0,
                offset_y: 3.0,
                ..Transform::IDENTITY
            },
            bounds,
        );
        assert_eq!(shifted.x, 0);
        assert_eq!(shifted.y, 3);

        let shifted = offset_area(
            Rect::new(0, 0, 20, 3),
            &Transform {
                offset_x: 2.0,
                ..Transform::IDENTITY
            },
            bounds,
        );
        assert_eq!(shifted.x, 2);
        assert_eq!(shifted.width, 18);
    }

    #[test]
    fn test_faded_content_is_dimmed() {
        let faded = Transform {
            opacity: 0.2,
            ..Transform::IDENTITY
        };
        assert!(transform_style(&faded).add_modifier.contains(Modifier::DIM));
        assert!(!transform_style(&Transform::IDENTITY)
            .add_modifier
            .contains(Modifier::DIM));
    }
}
