//! Screen controller
//!
//! Composes selection state, validation, the continue gate and transitions
//! into one unit per mounted screen. A controller is built fresh on every
//! mount and dropped on unmount; nothing carries over between visits.

use super::animator::{AnimationPlayer, Transform, Transition};
use super::gate::NavigationGate;
use super::host::NavigationHost;
use super::selection::SelectionState;
use super::validation::{validate, FieldName, FormFields, FormKind, FormRules, ValidationResult};
use crate::config::{ScreenKind, ScreenSpec};
use crate::models::{ChoiceOption, NavigationRequest, OptionId, ScreenId};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How mounted screens animate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    pub play_intro: bool,
    pub intro_duration: Duration,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            play_intro: true,
            intro_duration: Duration::from_millis(400),
        }
    }
}

/// Result of a continue or link action
#[derive(Debug, Clone, PartialEq)]
pub enum ContinueOutcome {
    /// A request was handed to the host
    Navigated(ScreenId),
    /// Continue is disabled; nothing happened
    Blocked,
    /// The form failed validation; errors are shown inline
    Rejected,
}

/// State of a form screen
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub rules: FormRules,
    values: FormFields,
    validation: Option<ValidationResult>,
    links: Vec<ChoiceOption>,
}

impl FormState {
    fn new(kind: FormKind, rules: FormRules, links: Vec<ChoiceOption>) -> Self {
        let values = kind
            .fields()
            .iter()
            .map(|field| (*field, String::new()))
            .collect();
        Self {
            kind,
            rules,
            values,
            validation: None,
            links,
        }
    }

    pub fn fields(&self) -> &'static [FieldName] {
        self.kind.fields()
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Result of the last submit attempt, if any
    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn links(&self) -> &[ChoiceOption] {
        &self.links
    }
}

/// What a mounted screen shows
#[derive(Debug, Clone)]
pub enum ScreenBody {
    Choice(SelectionState),
    Form(FormState),
}

/// Controller for one mounted screen
#[derive(Debug)]
pub struct ScreenController {
    id: ScreenId,
    title: String,
    subtitle: String,
    params: Map<String, Value>,
    body: ScreenBody,
    gate: NavigationGate,
    intro: Option<AnimationPlayer>,
    feedback: Option<AnimationPlayer>,
}

impl ScreenController {
    /// Mount a screen from its catalog entry
    ///
    /// `params` is the payload of the request that led here.
    pub fn mount(spec: &ScreenSpec, params: Map<String, Value>, animations: &AnimationSettings) -> Self {
        let (body, gate) = match &spec.kind {
            ScreenKind::Choice {
                mode,
                on_no_selection,
                options,
            } => (
                ScreenBody::Choice(SelectionState::new(*mode, options.clone())),
                NavigationGate::selection_required(*on_no_selection),
            ),
            ScreenKind::Form {
                form,
                destination,
                rules,
                links,
            } => (
                ScreenBody::Form(FormState::new(
                    *form,
                    rules.unwrap_or_else(|| form.default_rules()),
                    links.clone(),
                )),
                NavigationGate::form_required(*destination),
            ),
        };

        let intro = (spec.intro && animations.play_intro)
            .then(|| AnimationPlayer::start(Transition::fade_slide_in(animations.intro_duration)));

        debug!(screen = %spec.id, "mounted");
        Self {
            id: spec.id,
            title: spec.title.clone(),
            subtitle: spec.subtitle.clone(),
            params,
            body,
            gate,
            intro,
            feedback: None,
        }
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Payload received on mount
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn body(&self) -> &ScreenBody {
        &self.body
    }

    pub fn gate(&self) -> &NavigationGate {
        &self.gate
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        match &self.body {
            ScreenBody::Choice(selection) => Some(selection),
            ScreenBody::Form(_) => None,
        }
    }

    pub fn form(&self) -> Option<&FormState> {
        match &self.body {
            ScreenBody::Form(form) => Some(form),
            ScreenBody::Choice(_) => None,
        }
    }

    /// Choose an option by id; returns false for disabled options
    ///
    /// # Panics
    ///
    /// Panics on a form screen or for an undeclared id.
    pub fn choose(&mut self, id: &OptionId) -> bool {
        match &mut self.body {
            ScreenBody::Choice(selection) => selection.select(id),
            ScreenBody::Form(_) => panic!("screen '{}' has no options to choose", self.id),
        }
    }

    /// Choose the option at `index` in declaration order
    pub fn choose_index(&mut self, index: usize) -> bool {
        match &mut self.body {
            ScreenBody::Choice(selection) => selection.select_index(index),
            ScreenBody::Form(_) => panic!("screen '{}' has no options to choose", self.id),
        }
    }

    /// Drop every chosen option; a no-op on form screens
    pub fn clear_selection(&mut self) {
        if let ScreenBody::Choice(selection) = &mut self.body {
            selection.clear();
        }
    }

    /// Replace a form field's raw value; ignored for fields the form lacks
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        if let ScreenBody::Form(form) = &mut self.body {
            if let Some(slot) = form.values.get_mut(&field) {
                *slot = value.into();
            }
        }
    }

    /// Whether the continue control should render as enabled
    ///
    /// Forms validate on submit, so their control is always enabled.
    pub fn continue_enabled(&self) -> bool {
        match &self.body {
            ScreenBody::Choice(selection) => self.gate.can_continue(Some(selection), None),
            ScreenBody::Form(_) => true,
        }
    }

    /// Handle a confirmed continue
    pub fn submit<H: NavigationHost + ?Sized>(&mut self, host: &mut H) -> ContinueOutcome {
        let request = match &mut self.body {
            ScreenBody::Choice(selection) => self.gate.request(Some(&*selection), None, Map::new()),
            ScreenBody::Form(form) => {
                let result = validate(&form.rules, &form.values);
                let mut extra = Map::new();
                if let Some(email) = form.values.get(&FieldName::Email) {
                    extra.insert("email".to_string(), Value::String(email.trim().to_string()));
                }
                let request = self.gate.request(None, Some(&result), extra);
                if request.is_none() {
                    debug!(screen = %self.id, errors = result.field_errors().len(), "form rejected");
                    form.validation = Some(result);
                    self.feedback = Some(AnimationPlayer::start(Transition::shake()));
                    return ContinueOutcome::Rejected;
                }
                form.validation = Some(result);
                request
            }
        };

        match request {
            Some(request) => self.dispatch(request, host),
            None => ContinueOutcome::Blocked,
        }
    }

    /// Follow a form link by index
    pub fn follow_link<H: NavigationHost + ?Sized>(
        &mut self,
        index: usize,
        host: &mut H,
    ) -> ContinueOutcome {
        let destination = self
            .form()
            .and_then(|form| form.links.get(index))
            .and_then(|link| link.destination);
        match destination {
            Some(destination) => self.dispatch(NavigationRequest::new(destination), host),
            None => ContinueOutcome::Blocked,
        }
    }

    /// Ask the host to return to the previous screen
    pub fn back<H: NavigationHost + ?Sized>(&mut self, host: &mut H) {
        info!(from = %self.id, "navigating back");
        host.go_back();
    }

    /// Intro transform at `now`; identity once the intro finished
    pub fn intro_transform(&self, now: Instant) -> Transform {
        self.intro
            .as_ref()
            .map(|player| player.sample_at(now))
            .unwrap_or_default()
    }

    /// Feedback transform at `now`; identity when no feedback is playing
    pub fn feedback_transform(&self, now: Instant) -> Transform {
        self.feedback
            .as_ref()
            .map(|player| player.sample_at(now))
            .unwrap_or_default()
    }

    /// Whether the invalid-submit feedback is still playing
    pub fn feedback_active(&self, now: Instant) -> bool {
        self.feedback
            .as_ref()
            .map(|player| !player.is_finished_at(now))
            .unwrap_or(false)
    }

    /// Drop finished players
    pub fn tick(&mut self, now: Instant) {
        if self.intro.as_ref().is_some_and(|p| p.is_finished_at(now)) {
            self.intro = None;
        }
        if self.feedback.as_ref().is_some_and(|p| p.is_finished_at(now)) {
            self.feedback = None;
        }
    }

    fn dispatch<H: NavigationHost + ?Sized>(
        &mut self,
        request: NavigationRequest,
        host: &mut H,
    ) -> ContinueOutcome {
        let destination = request.destination();
        info!(from = %self.id, to = %destination, "navigating");
        host.navigate(request);
        ContinueOutcome::Navigated(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenCatalog;
    use crate::flow::host::RecordingHost;
    use crate::flow::validation::FieldError;

    fn mount(id: ScreenId) -> ScreenController {
        let catalog = ScreenCatalog::builtin();
        ScreenController::mount(
            catalog.get(id).unwrap(),
            Map::new(),
            &AnimationSettings::default(),
        )
    }

    #[test]
    fn test_choice_blocked_until_selection() {
        let mut controller = mount(ScreenId::Onboarding);
        let mut host = RecordingHost::default();
        assert!(!controller.continue_enabled());
        assert_eq!(controller.submit(&mut host), ContinueOutcome::Blocked);
        assert!(host.requests.is_empty());

        controller.choose(&"have_account".into());
        assert!(controller.continue_enabled());
        assert_eq!(
            controller.submit(&mut host),
            ContinueOutcome::Navigated(ScreenId::Login)
        );
        assert_eq!(host.requests.len(), 1);
    }

    #[test]
    fn test_fallback_screen_continues_without_selection() {
        let mut controller = mount(ScreenId::LevelSelect);
        let mut host = RecordingHost::default();
        assert!(controller.continue_enabled());
        assert_eq!(
            controller.submit(&mut host),
            ContinueOutcome::Navigated(ScreenId::ModuleSelect)
        );
    }

    #[test]
    fn test_coming_soon_module_stays_disabled() {
        let mut controller = mount(ScreenId::ModuleSelect);
        assert!(!controller.choose(&"listening".into()));
        assert!(!controller.continue_enabled());
    }

    #[test]
    fn test_clear_selection_blocks_continue_again() {
        let mut controller = mount(ScreenId::Onboarding);
        controller.choose(&"have_account".into());
        assert!(controller.continue_enabled());

        controller.clear_selection();
        assert!(controller.selection().unwrap().current().is_none());
        assert!(!controller.continue_enabled());
    }

    #[test]
    fn test_login_rejects_short_password() {
        let mut controller = mount(ScreenId::Login);
        let mut host = RecordingHost::default();
        controller.set_field(FieldName::Email, "a@b.com");
        controller.set_field(FieldName::Password, "12345");
        assert_eq!(controller.submit(&mut host), ContinueOutcome::Rejected);
        assert!(host.requests.is_empty());

        let validation = controller.form().unwrap().validation().unwrap();
        assert_eq!(validation.field_errors().len(), 1);
        assert_eq!(
            validation.error(FieldName::Password),
            Some(&FieldError::TooShort { min: 6 })
        );
        assert!(controller.feedback_active(Instant::now()));
        assert!(controller.continue_enabled());
    }

    #[test]
    fn test_login_routes_home_and_forwards_email() {
        let mut controller = mount(ScreenId::Login);
        let mut host = RecordingHost::default();
        controller.set_field(FieldName::Email, " a@b.com ");
        controller.set_field(FieldName::Password, "123456");
        assert_eq!(
            controller.submit(&mut host),
            ContinueOutcome::Navigated(ScreenId::Home)
        );
        let request = &host.requests[0];
        assert_eq!(request.params()["email"], "a@b.com");
        assert!(request.params().get("password").is_none());
    }

    #[test]
    fn test_unknown_field_ignored() {
        let mut controller = mount(ScreenId::Login);
        controller.set_field(FieldName::ConfirmPassword, "x");
        assert_eq!(controller.form().unwrap().value(FieldName::ConfirmPassword), "");
    }

    #[test]
    fn test_links_navigate_immediately() {
        let mut controller = mount(ScreenId::Login);
        let mut host = RecordingHost::default();
        assert_eq!(
            controller.follow_link(0, &mut host),
            ContinueOutcome::Navigated(ScreenId::ResetPassword)
        );
        assert_eq!(controller.follow_link(9, &mut host), ContinueOutcome::Blocked);
    }

    #[test]
    fn test_back_delegates_to_host() {
        let mut controller = mount(ScreenId::Home);
        let mut host = RecordingHost::default();
        controller.back(&mut host);
        assert_eq!(host.back_count, 1);
    }

    #[test]
    fn test_intro_respects_settings() {
        let catalog = ScreenCatalog::builtin();
        let settings = AnimationSettings {
            play_intro: false,
            ..AnimationSettings::default()
        };
        let controller = ScreenController::mount(
            catalog.get(ScreenId::Home).unwrap(),
            Map::new(),
            &settings,
        );
        assert_eq!(controller.intro_transform(Instant::now()), Transform::IDENTITY);
    }

    #[test]
    fn test_tick_drops_finished_players() {
        let mut controller = mount(ScreenId::Login);
        let mut host = RecordingHost::default();
        controller.submit(&mut host);
        let later = Instant::now() + Duration::from_secs(2);
        controller.tick(later);
        assert!(!controller.feedback_active(later));
        assert_eq!(controller.intro_transform(later), Transform::IDENTITY);
    }
}
