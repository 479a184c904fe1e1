//! Screen identifiers
//!
//! Every navigable view has one identifier. The set is closed so a
//! destination typo is a parse error instead of a runtime lookup miss.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a navigable screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenId {
    /// First-run welcome screen
    Onboarding,
    /// Email and password login form
    Login,
    /// Account creation form
    Register,
    /// Password reset form
    ResetPassword,
    /// Landing screen after login
    Home,
    /// Difficulty level selection
    LevelSelect,
    /// Learning module selection
    ModuleSelect,
    /// Vocabulary category picker
    VocabularyCategories,
    /// Grammar topic picker
    GrammarTopics,
    /// Lesson placeholder for the chosen material
    Lesson,
}

impl ScreenId {
    pub const ALL: [ScreenId; 10] = [
        ScreenId::Onboarding,
        ScreenId::Login,
        ScreenId::Register,
        ScreenId::ResetPassword,
        ScreenId::Home,
        ScreenId::LevelSelect,
        ScreenId::ModuleSelect,
        ScreenId::VocabularyCategories,
        ScreenId::GrammarTopics,
        ScreenId::Lesson,
    ];

    /// Stable snake_case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenId::Onboarding => "onboarding",
            ScreenId::Login => "login",
            ScreenId::Register => "register",
            ScreenId::ResetPassword => "reset_password",
            ScreenId::Home => "home",
            ScreenId::LevelSelect => "level_select",
            ScreenId::ModuleSelect => "module_select",
            ScreenId::VocabularyCategories => "vocabulary_categories",
            ScreenId::GrammarTopics => "grammar_topics",
            ScreenId::Lesson => "lesson",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| format!("unknown screen '{}'", s))
    }
}
