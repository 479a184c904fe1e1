//! Form screen
//!
//! Text fields, a submit button and the form's links, focused in that
//! order. Typing edits the focused field. A rejected submit shows the
//! errors inline and shakes the form for a moment.

use super::{offset_area, render_header, render_help, step_focus, transform_style};
use crate::app::state::InputAction;
use crate::flow::{ContinueOutcome, FieldName, FormState, NavigationHost, ScreenController};
use crate::util::mask_secret;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// What a focus index points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Field(FieldName),
    Submit,
    Link(usize),
}

/// View state of a form screen
#[derive(Debug, Default)]
pub struct FormScreen {
    focus: usize,
}

impl FormScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    fn entry(&self, form: &FormState) -> Entry {
        let fields = form.fields();
        if let Some(field) = fields.get(self.focus) {
            Entry::Field(*field)
        } else if self.focus == fields.len() {
            Entry::Submit
        } else {
            Entry::Link(self.focus - fields.len() - 1)
        }
    }

    pub fn handle<H: NavigationHost + ?Sized>(
        &mut self,
        action: &InputAction,
        controller: &mut ScreenController,
        host: &mut H,
    ) -> Option<ContinueOutcome> {
        let form = controller.form()?;
        let entries = form.fields().len() + 1 + form.links().len();
        let entry = self.entry(form);

        match (action, entry) {
            (InputAction::Up | InputAction::Previous, _) => {
                self.focus = step_focus(self.focus, entries, false)
            }
            (InputAction::Down | InputAction::Next, _) => {
                self.focus = step_focus(self.focus, entries, true)
            }
            (InputAction::Char(c), Entry::Field(field)) => {
                let mut value = form.value(field).to_string();
                value.push(*c);
                controller.set_field(field, value);
            }
            (InputAction::Backspace, Entry::Field(field)) => {
                let mut value = form.value(field).to_string();
                value.pop();
                controller.set_field(field, value);
            }
            (InputAction::Select, Entry::Field(_)) => self.focus += 1,
            (InputAction::Select, Entry::Submit) => return Some(controller.submit(host)),
            (InputAction::Select, Entry::Link(index)) => {
                return Some(controller.follow_link(index, host))
            }
            _ => {}
        }
        None
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, controller: &ScreenController, now: Instant) {
        let Some(form) = controller.form() else {
            return;
        };
        let intro = controller.intro_transform(now);
        let style = transform_style(&intro);
        let content = offset_area(area, &intro, area);

        let mut constraints = vec![Constraint::Length(5)];
        constraints.extend(form.fields().iter().map(|_| Constraint::Length(4)));
        constraints.push(Constraint::Length(3)); // Submit
        constraints.push(Constraint::Length(form.links().len() as u16 + 2));
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(3)); // Help

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(content);

        render_header(f, chunks[0], controller, style);

        let shake = controller.feedback_transform(now);
        let entry = self.entry(form);
        for (index, field) in form.fields().iter().enumerate() {
            let slot = offset_area(chunks[index + 1], &shake, content);
            self.render_field(f, slot, form, *field, entry == Entry::Field(*field), style);
        }

        let submit_at = form.fields().len() + 1;
        let submit_area = offset_area(chunks[submit_at], &shake, content);
        let shaking = controller.feedback_active(now);
        self.render_submit(f, submit_area, form, entry == Entry::Submit, shaking, style);
        self.render_links(f, chunks[submit_at + 1], form, entry, style);

        render_help(
            f,
            chunks[submit_at + 3],
            &[
                ("↑↓/Tab", "Move"),
                ("Enter", "Next/Submit"),
                ("Esc", "Back"),
                ("Ctrl+C", "Quit"),
            ],
        );
    }

    fn render_field(
        &self,
        f: &mut Frame,
        area: Rect,
        form: &FormState,
        field: FieldName,
        focused: bool,
        style: Style,
    ) {
        let raw = form.value(field);
        let mut text = if field.is_secret() {
            mask_secret(raw)
        } else {
            raw.to_string()
        };
        if focused {
            text.push('▏');
        }

        let error = form.validation().and_then(|v| v.error(field));
        let border = match (error, focused) {
            (Some(_), _) => Style::default().fg(Color::Red),
            (None, true) => Style::default().fg(Color::Yellow),
            (None, false) => Style::default(),
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let input = Paragraph::new(text).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(field.label()),
        );
        f.render_widget(input, chunks[0]);

        if let Some(error) = error {
            let message = Paragraph::new(Line::from(Span::styled(
                format!(" {}", error),
                Style::default().fg(Color::Red),
            )));
            f.render_widget(message, chunks[1]);
        }
    }

    fn render_submit(
        &self,
        f: &mut Frame,
        area: Rect,
        form: &FormState,
        focused: bool,
        shaking: bool,
        style: Style,
    ) {
        // still pressable while shaking, only drawn muted
        let button_style = match (shaking, focused) {
            (true, _) => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            (false, true) => Style::default().bg(Color::Cyan).fg(Color::Black),
            (false, false) => Style::default().fg(Color::Cyan),
        };
        let button = Paragraph::new(form.kind.submit_label())
            .style(button_style.patch(style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(button_style));
        f.render_widget(button, area);
    }

    fn render_links(&self, f: &mut Frame, area: Rect, form: &FormState, entry: Entry, style: Style) {
        if form.links().is_empty() {
            return;
        }
        let lines: Vec<Line> = form
            .links()
            .iter()
            .enumerate()
            .map(|(index, link)| {
                let link_style = if entry == Entry::Link(index) {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED)
                };
                Line::from(Span::styled(link.label.clone(), link_style))
            })
            .collect();

        let links = Paragraph::new(lines)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(links, area);
    }
}
