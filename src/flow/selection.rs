//! Per-screen selection tracking
//!
//! The selection is stored as indices into the option list the state owns,
//! so it can only ever point at one of the screen's declared options.

use crate::models::{ChoiceOption, OptionId};
use serde::{Deserialize, Serialize};

/// Whether a screen accepts one option or several
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

/// Borrowed view of the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum Selected<'a> {
    None,
    One(&'a ChoiceOption),
    Many(Vec<&'a ChoiceOption>),
}

impl<'a> Selected<'a> {
    pub fn is_none(&self) -> bool {
        match self {
            Selected::None => true,
            Selected::One(_) => false,
            Selected::Many(options) => options.is_empty(),
        }
    }

    /// Selected options in declaration order
    pub fn options(&self) -> Vec<&'a ChoiceOption> {
        match self {
            Selected::None => Vec::new(),
            Selected::One(option) => vec![*option],
            Selected::Many(options) => options.clone(),
        }
    }
}

/// Selection tracker for one mounted screen
#[derive(Debug, Clone)]
pub struct SelectionState {
    mode: SelectionMode,
    options: Vec<ChoiceOption>,
    /// Sorted indices into `options`; at most one entry in single mode
    selected: Vec<usize>,
}

impl SelectionState {
    /// Create an empty selection over the screen's declared options
    pub fn new(mode: SelectionMode, options: Vec<ChoiceOption>) -> Self {
        Self {
            mode,
            options,
            selected: Vec::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Select an option by id
    ///
    /// Single mode replaces any previous choice; multi mode toggles the
    /// option in or out. Disabled options are left untouched and `false` is
    /// returned.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not one of the declared options.
    pub fn select(&mut self, id: &OptionId) -> bool {
        let index = self.index_of(id).unwrap_or_else(|| {
            panic!("option '{}' is not declared on this screen", id)
        });
        self.select_index(index)
    }

    /// Select the option at `index` in declaration order
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        assert!(
            index < self.options.len(),
            "option index {} out of range ({} options)",
            index,
            self.options.len()
        );
        if !self.options[index].is_enabled() {
            return false;
        }

        match self.mode {
            SelectionMode::Single => {
                self.selected.clear();
                self.selected.push(index);
            }
            SelectionMode::Multi => match self.selected.binary_search(&index) {
                Ok(pos) => {
                    self.selected.remove(pos);
                }
                Err(pos) => self.selected.insert(pos, index),
            },
        }
        true
    }

    pub fn is_selected(&self, id: &OptionId) -> bool {
        self.index_of(id)
            .map(|index| self.selected.binary_search(&index).is_ok())
            .unwrap_or(false)
    }

    pub fn is_index_selected(&self, index: usize) -> bool {
        self.selected.binary_search(&index).is_ok()
    }

    pub fn current(&self) -> Selected<'_> {
        match (self.mode, self.selected.as_slice()) {
            (_, []) => Selected::None,
            (SelectionMode::Single, [index, ..]) => Selected::One(&self.options[*index]),
            (SelectionMode::Multi, indices) => {
                Selected::Many(indices.iter().map(|i| &self.options[*i]).collect())
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    fn index_of(&self, id: &OptionId) -> Option<usize> {
        self.options.iter().position(|option| &option.id == id)
    }
}
