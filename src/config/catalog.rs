//! Screen catalog
//!
//! Declares every screen's options, gate policy and form rules as data.
//! The built-in catalog describes the shipped flow; an alternative can be
//! loaded from TOML and is checked against the host's screen registry
//! before use.

use crate::flow::gate::NoSelectionPolicy;
use crate::flow::host::ScreenRegistry;
use crate::flow::selection::SelectionMode;
use crate::flow::validation::{FormKind, FormRules};
use crate::models::{ChoiceOption, ScreenId};
use crate::{LinguaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Static description of one screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSpec {
    pub id: ScreenId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Play the intro transition when the screen mounts
    #[serde(default = "default_true")]
    pub intro: bool,
    pub kind: ScreenKind,
}

/// Behaviour of a screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenKind {
    /// Pick from a list of options, continue routes by the choice
    Choice {
        #[serde(default)]
        mode: SelectionMode,
        #[serde(default)]
        on_no_selection: NoSelectionPolicy,
        options: Vec<ChoiceOption>,
    },
    /// Fill a form, continue routes to a fixed destination once valid
    Form {
        form: FormKind,
        destination: ScreenId,
        /// Overrides the form's default rules
        #[serde(default)]
        rules: Option<FormRules>,
        /// Secondary actions that navigate immediately
        #[serde(default)]
        links: Vec<ChoiceOption>,
    },
}

/// All screens of the app plus the one shown first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenCatalog {
    pub initial: ScreenId,
    pub screens: Vec<ScreenSpec>,
}

impl ScreenCatalog {
    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| LinguaError::CatalogError(format!("Failed to parse catalog: {}", e)))
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LinguaError::CatalogError(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn get(&self, id: ScreenId) -> Option<&ScreenSpec> {
        self.screens.iter().find(|s| s.id == id)
    }

    /// Registry of the screens this catalog defines
    pub fn registry(&self) -> ScreenRegistry {
        ScreenRegistry::new(self.screens.iter().map(|s| s.id))
    }

    /// Check the catalog against the screens a host can show
    ///
    /// Every screen id must be unique, every destination and fallback must be
    /// registered, option ids must be unique per screen, and choice screens
    /// need at least one option.
    pub fn validate(&self, registry: &ScreenRegistry) -> Result<()> {
        let mut seen = BTreeSet::new();
        for screen in &self.screens {
            if !seen.insert(screen.id) {
                return Err(LinguaError::CatalogError(format!(
                    "Screen '{}' is declared more than once",
                    screen.id
                )));
            }
        }

        let check = |from: ScreenId, to: ScreenId| -> Result<()> {
            if registry.contains(to) {
                Ok(())
            } else {
                Err(LinguaError::CatalogError(format!(
                    "Screen '{}' routes to unregistered screen '{}'",
                    from, to
                )))
            }
        };

        if !registry.contains(self.initial) {
            return Err(LinguaError::CatalogError(format!(
                "Initial screen '{}' is not registered",
                self.initial
            )));
        }

        for screen in &self.screens {
            let options = match &screen.kind {
                ScreenKind::Choice {
                    on_no_selection,
                    options,
                    ..
                } => {
                    if options.is_empty() {
                        return Err(LinguaError::CatalogError(format!(
                            "Choice screen '{}' declares no options",
                            screen.id
                        )));
                    }
                    if let NoSelectionPolicy::Fallback(fallback) = on_no_selection {
                        check(screen.id, *fallback)?;
                    }
                    options
                }
                ScreenKind::Form {
                    destination, links, ..
                } => {
                    check(screen.id, *destination)?;
                    links
                }
            };

            let mut ids = BTreeSet::new();
            for option in options {
                if !ids.insert(&option.id) {
                    return Err(LinguaError::CatalogError(format!(
                        "Option '{}' is declared twice on screen '{}'",
                        option.id, screen.id
                    )));
                }
                if let Some(destination) = option.destination {
                    check(screen.id, destination)?;
                }
            }
        }
        Ok(())
    }

    /// The flow shipped with the app
    pub fn builtin() -> Self {
        use ScreenId::*;

        let choice = |mode, on_no_selection, options| ScreenKind::Choice {
            mode,
            on_no_selection,
            options,
        };
        let form = |form, destination, links| ScreenKind::Form {
            form,
            destination,
            rules: None,
            links,
        };
        let screen = |id, title: &str, subtitle: &str, kind| ScreenSpec {
            id,
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            intro: true,
            kind,
        };

        let levels = [
            ("beginner", "Beginner", "A1"),
            ("elementary", "Elementary", "A2"),
            ("intermediate", "Intermediate", "B1"),
            ("advanced", "Advanced", "B2"),
        ]
        .into_iter()
        .map(|(id, label, cefr)| {
            ChoiceOption::new(id, format!("{} ({})", label, cefr), Some(ModuleSelect))
                .with_metadata(json!({ "level": cefr }))
        })
        .collect();

        let categories = [
            ("greetings", "Greetings"),
            ("food", "Food & drink"),
            ("travel", "Travel"),
            ("family", "Family"),
            ("numbers", "Numbers"),
        ]
        .into_iter()
        .map(|(id, label)| {
            ChoiceOption::new(id, label, Some(Lesson)).with_metadata(json!({ "category": id }))
        })
        .collect();

        let topics = [
            ("present_tense", "Present tense"),
            ("articles", "Articles"),
            ("plurals", "Plurals"),
            ("questions", "Asking questions"),
        ]
        .into_iter()
        .map(|(id, label)| {
            ChoiceOption::new(id, label, Some(Lesson)).with_metadata(json!({ "topic": id }))
        })
        .collect();

        Self {
            initial: Onboarding,
            screens: vec![
                screen(
                    Onboarding,
                    "Welcome to Linguaflow",
                    "Learn a language a few minutes a day",
                    choice(
                        SelectionMode::Single,
                        NoSelectionPolicy::Block,
                        vec![
                            ChoiceOption::new("get_started", "Get started", Some(Register)),
                            ChoiceOption::new("have_account", "I already have an account", Some(Login)),
                        ],
                    ),
                ),
                screen(
                    Login,
                    "Log in",
                    "Welcome back",
                    form(
                        FormKind::Login,
                        Home,
                        vec![
                            ChoiceOption::new("forgot_password", "Forgot password?", Some(ResetPassword)),
                            ChoiceOption::new("create_account", "Create an account", Some(Register)),
                        ],
                    ),
                ),
                screen(
                    Register,
                    "Create your account",
                    "It only takes a minute",
                    form(
                        FormKind::Register,
                        LevelSelect,
                        vec![ChoiceOption::new("have_account", "I already have an account", Some(Login))],
                    ),
                ),
                screen(
                    ResetPassword,
                    "Reset password",
                    "Choose a new password",
                    form(
                        FormKind::ResetPassword,
                        Login,
                        vec![ChoiceOption::new("back_to_login", "Back to login", Some(Login))],
                    ),
                ),
                screen(
                    Home,
                    "Home",
                    "What would you like to do?",
                    choice(
                        SelectionMode::Single,
                        NoSelectionPolicy::Block,
                        vec![
                            ChoiceOption::new("continue", "Continue learning", Some(ModuleSelect)),
                            ChoiceOption::new("change_level", "Change level", Some(LevelSelect)),
                            ChoiceOption::new("log_out", "Log out", Some(Login)),
                        ],
                    ),
                ),
                screen(
                    LevelSelect,
                    "Choose your level",
                    "You can change this later",
                    choice(
                        SelectionMode::Single,
                        NoSelectionPolicy::Fallback(ModuleSelect),
                        levels,
                    ),
                ),
                screen(
                    ModuleSelect,
                    "Choose a module",
                    "",
                    choice(
                        SelectionMode::Single,
                        NoSelectionPolicy::Block,
                        vec![
                            ChoiceOption::new("vocabulary", "Vocabulary", Some(VocabularyCategories)),
                            ChoiceOption::new("grammar", "Grammar", Some(GrammarTopics)),
                            ChoiceOption::new("listening", "Listening", None),
                            ChoiceOption::new("speaking", "Speaking", None),
                        ],
                    ),
                ),
                screen(
                    VocabularyCategories,
                    "Vocabulary",
                    "Pick one or more categories",
                    choice(SelectionMode::Multi, NoSelectionPolicy::Block, categories),
                ),
                screen(
                    GrammarTopics,
                    "Grammar",
                    "Pick a topic",
                    choice(
                        SelectionMode::Single,
                        NoSelectionPolicy::Fallback(Lesson),
                        topics,
                    ),
                ),
                screen(
                    Lesson,
                    "Lesson",
                    "",
                    choice(
                        SelectionMode::Single,
                        NoSelectionPolicy::Block,
                        vec![
                            ChoiceOption::new("finish", "Finish lesson", Some(Home)),
                            ChoiceOption::new("other_module", "Pick another module", Some(ModuleSelect)),
                        ],
                    ),
                ),
            ],
        }
    }
}

impl Default for ScreenCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
