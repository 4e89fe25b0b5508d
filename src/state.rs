//! Application state - single source of truth

use std::collections::{HashMap, HashSet};
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api::API_BASE;
use crate::artwork::Artwork;
use crate::collection::Collection;
use crate::loader::LoadReport;

/// Types offered in the selection form.
pub const CATEGORIES: [&str; 18] = [
    "normal", "fire", "water", "grass", "electric", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

/// How many moves the moves modal lists.
pub const MOVES_SHOWN: usize = 5;

pub const DEFAULT_COUNT: usize = 5;

/// One Pokemon, fully loaded for display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    pub weight: f64,
    pub height: f64,
    pub types: Vec<String>,
    pub moves: Vec<String>,
    pub image: Option<String>,
}

impl Pokemon {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// The first `MOVES_SHOWN` moves; the full list stays untouched.
    pub fn clamped_moves(&self) -> &[String] {
        &self.moves[..self.moves.len().min(MOVES_SHOWN)]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Select,
    Results,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectForm {
    pub category_index: usize,
    pub count_input: String,
}

impl Default for SelectForm {
    fn default() -> Self {
        Self {
            category_index: 0,
            count_input: DEFAULT_COUNT.to_string(),
        }
    }
}

impl SelectForm {
    pub fn category(&self) -> Option<&'static str> {
        CATEGORIES.get(self.category_index).copied()
    }

    /// Parsed count, `None` unless it is a whole number of at least 1.
    /// Numbers too large for `usize` saturate; the loader caps them anyway.
    pub fn count(&self) -> Option<usize> {
        let parsed = match self.count_input.trim().parse::<usize>() {
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
            parsed => parsed.ok(),
        };
        parsed.filter(|count| *count > 0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub api_base: String,
    pub screen: Screen,
    pub form: SelectForm,
    pub collection: Collection,
    pub loading: bool,
    pub last_report: Option<LoadReport>,
    pub moves_open: bool,
    /// Blocking message; any key dismisses it.
    pub alert: Option<String>,
    /// Non-blocking status line.
    pub message: Option<String>,
    pub artwork: HashMap<String, Artwork>,
    /// Names whose artwork download has been started for this batch.
    pub artwork_requested: HashSet<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl AppState {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            screen: Screen::Select,
            form: SelectForm::default(),
            collection: Collection::new(),
            loading: false,
            last_report: None,
            moves_open: false,
            alert: None,
            message: None,
            artwork: HashMap::new(),
            artwork_requested: HashSet::new(),
            tick: 0,
        }
    }

    /// Pre-fill the form, e.g. from the command line.
    pub fn with_selection(mut self, category: &str, count: usize) -> Self {
        if let Some(index) = CATEGORIES.iter().position(|c| *c == category) {
            self.form.category_index = index;
        }
        self.form.count_input = count.to_string();
        self
    }

    pub fn current(&self) -> Option<&Pokemon> {
        self.collection.current()
    }

    pub fn current_artwork(&self) -> Option<&Artwork> {
        let pokemon = self.current()?;
        self.artwork.get(&pokemon.name)
    }

    /// Footer text: the latest message, else the last load summary.
    pub fn status_line(&self) -> String {
        if self.loading {
            return "Loading…".to_string();
        }
        self.message
            .clone()
            .or_else(|| self.last_report.as_ref().map(LoadReport::summary))
            .unwrap_or_default()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Form")
                .entry("screen", ron_string(&self.screen))
                .entry("category", ron_string(&self.form.category()))
                .entry("count", ron_string(&self.form.count_input)),
            DebugSection::new("Collection")
                .entry("items", ron_string(&self.collection.len()))
                .entry("cursor", ron_string(&self.collection.cursor()))
                .entry(
                    "current",
                    ron_string(&self.current().map(|pokemon| pokemon.name.clone())),
                )
                .entry("report", ron_string(&self.last_report)),
            DebugSection::new("Status")
                .entry("loading", ron_string(&self.loading))
                .entry("moves_open", ron_string(&self.moves_open))
                .entry("alert", ron_string(&self.alert))
                .entry("message", ron_string(&self.message))
                .entry("artwork", ron_string(&self.artwork.len())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_moves() {
        let mut pokemon = Pokemon {
            moves: (1..=8).map(|n| format!("move-{n}")).collect(),
            ..Default::default()
        };
        let clamped = pokemon.clamped_moves().to_vec();
        assert_eq!(
            clamped,
            vec!["move-1", "move-2", "move-3", "move-4", "move-5"]
        );
        assert_eq!(pokemon.moves.len(), 8);

        pokemon.moves.truncate(2);
        assert_eq!(pokemon.clamped_moves(), &["move-1", "move-2"]);

        pokemon.moves.clear();
        assert!(pokemon.clamped_moves().is_empty());
    }

    #[test]
    fn test_primary_type() {
        let pokemon = Pokemon {
            types: vec!["water".into(), "ice".into()],
            ..Default::default()
        };
        assert_eq!(pokemon.primary_type(), Some("water"));
        assert_eq!(Pokemon::default().primary_type(), None);
    }

    #[test]
    fn test_form_count_validation() {
        let mut form = SelectForm::default();
        assert_eq!(form.count(), Some(DEFAULT_COUNT));

        for bad in ["", "0", "-2", "abc", "1.5"] {
            form.count_input = bad.to_string();
            assert_eq!(form.count(), None, "{bad:?} should be rejected");
        }

        form.count_input = " 12 ".to_string();
        assert_eq!(form.count(), Some(12));

        form.count_input = "99999999999999999999".to_string();
        assert_eq!(form.count(), Some(usize::MAX));

        form.count_input = "00000000000000000000000".to_string();
        assert_eq!(form.count(), None);
    }

    #[test]
    fn test_status_line_prefers_message() {
        let mut state = AppState::default();
        assert_eq!(state.status_line(), "");

        state.last_report = Some(LoadReport {
            category: "fire".into(),
            requested: 2,
            available: 10,
            loaded: 2,
            ..Default::default()
        });
        assert_eq!(state.status_line(), "fire: 2 of 2 loaded");

        state.message = Some("Load cancelled.".into());
        assert_eq!(state.status_line(), "Load cancelled.");

        state.loading = true;
        assert_eq!(state.status_line(), "Loading…");
    }

    #[test]
    fn test_with_selection() {
        let state = AppState::default().with_selection("water", 7);
        assert_eq!(state.form.category(), Some("water"));
        assert_eq!(state.form.count(), Some(7));
    }
}
