//! Rewrite rules
//!
//! A rule names the files it applies to (a glob relative to the walk root),
//! what to find, what to put instead, and a guard that must be present in
//! the file before anything is replaced. Once a rule has been applied the
//! guard no longer matches, so running the same rules again is a no-op.

use crate::{LinguaError, Result};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Rule as written in the rules file
#[derive(Debug, Clone, Deserialize)]
struct RawRule {
    name: String,
    files: String,
    find: String,
    replace: String,
    #[serde(default)]
    regex: bool,
    #[serde(default)]
    guard: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RawRule>,
}

/// What a rule searches for
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Literal(needle) => text.contains(needle.as_str()),
            Matcher::Regex(re) => re.is_match(text),
        }
    }
}

/// A compiled substitution rule
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub name: String,
    files: Pattern,
    find: Matcher,
    replace: String,
    guard: Option<String>,
}

impl RewriteRule {
    /// Literal find-and-replace, guarded by the find text itself
    pub fn literal(name: &str, files: &str, find: &str, replace: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            files: Pattern::new(files)?,
            find: Matcher::Literal(find.to_string()),
            replace: replace.to_string(),
            guard: None,
        })
    }

    /// Regex substitution; `replace` may use `$1`-style captures
    pub fn regex(name: &str, files: &str, find: &str, replace: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            files: Pattern::new(files)?,
            find: Matcher::Regex(Regex::new(find)?),
            replace: replace.to_string(),
            guard: None,
        })
    }

    /// Require `guard` to be present instead of the find text
    pub fn with_guard(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    /// Glob the rule's target files must match, relative to the walk root
    pub fn files_pattern(&self) -> &str {
        self.files.as_str()
    }

    /// Whether the rule targets the file at `relative` (path from the root)
    pub fn applies_to(&self, relative: &Path) -> bool {
        self.files.matches_path(relative)
    }

    /// Whether the guard condition holds for `text`
    pub fn guard_matches(&self, text: &str) -> bool {
        match &self.guard {
            Some(guard) => text.contains(guard.as_str()),
            None => self.find.is_match(text),
        }
    }

    /// Apply the rule; `None` when the guard fails or nothing changes
    pub fn apply<'a>(&self, text: &'a str) -> Option<Cow<'a, str>> {
        if !self.guard_matches(text) {
            return None;
        }
        let replaced = match &self.find {
            Matcher::Literal(needle) => {
                if text.contains(needle.as_str()) {
                    Cow::Owned(text.replace(needle.as_str(), &self.replace))
                } else {
                    Cow::Borrowed(text)
                }
            }
            Matcher::Regex(re) => re.replace_all(text, self.replace.as_str()),
        };
        match replaced {
            Cow::Owned(s) if s != text => Some(Cow::Owned(s)),
            _ => None,
        }
    }
}

/// Ordered collection of rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// Parse a TOML rules file body
    ///
    /// ```toml
    /// [[rule]]
    /// name = "fix-login-target"
    /// files = "**/*Screen.js"
    /// find = "navigate('Signin')"
    /// replace = "navigate('Login')"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawRuleFile = toml::from_str(content)
            .map_err(|e| LinguaError::RuleError(format!("Failed to parse rules: {}", e)))?;

        let mut rules = Vec::with_capacity(raw.rules.len());
        for rule in raw.rules {
            let compiled = if rule.regex {
                RewriteRule::regex(&rule.name, &rule.files, &rule.find, &rule.replace)
            } else {
                RewriteRule::literal(&rule.name, &rule.files, &rule.find, &rule.replace)
            }
            .map_err(|e| LinguaError::RuleError(format!("rule '{}': {}", rule.name, e)))?;
            rules.push(match rule.guard {
                Some(guard) => compiled.with_guard(guard),
                None => compiled,
            });
        }
        if rules.is_empty() {
            return Err(LinguaError::RuleError("rules file defines no rules".to_string()));
        }
        Ok(Self { rules })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LinguaError::RuleError(format!("Failed to read rules file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Whether any rule targets the file at `relative`
    pub fn targets(&self, relative: &Path) -> bool {
        self.rules.iter().any(|rule| rule.applies_to(relative))
    }

    /// Apply every rule targeting `relative`, in order
    ///
    /// Returns the new contents and the names of rules that changed
    /// something, or `None` when the file is left as is.
    pub fn apply(&self, relative: &Path, text: &str) -> Option<(String, Vec<String>)> {
        let mut current = text.to_string();
        let mut applied = Vec::new();
        for rule in self.rules.iter().filter(|rule| rule.applies_to(relative)) {
            if let Some(next) = rule.apply(&current) {
                let next = next.into_owned();
                applied.push(rule.name.clone());
                current = next;
            }
        }
        (!applied.is_empty()).then_some((current, applied))
    }
}
