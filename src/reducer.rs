//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::loader::LoadedBatch;
use crate::state::{AppState, Screen, CATEGORIES};

pub const ALERT_NO_CATEGORY: &str = "Please select a Pokémon type.";
pub const ALERT_BAD_COUNT: &str = "Please enter a valid count (1 or more).";
pub const ALERT_NOTHING_LOADED: &str =
    "No Pokémon loaded. The API may have failed or the type has no Pokémon.";
pub const ALERT_LOAD_FAILED: &str = "Failed to load Pokémon. Try again later.";

/// Artwork is fetched for the current card and this many cards on each side.
pub const ARTWORK_WINDOW: usize = 1;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Form =====
        Action::FormCategorySelect(index) => {
            if state.loading || index >= CATEGORIES.len() || index == state.form.category_index {
                return DispatchResult::unchanged();
            }
            state.form.category_index = index;
            DispatchResult::changed()
        }

        Action::FormCountChange(value) => {
            if state.loading {
                return DispatchResult::unchanged();
            }
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            if digits == state.form.count_input {
                return DispatchResult::unchanged();
            }
            state.form.count_input = digits;
            DispatchResult::changed()
        }

        Action::FormSubmit => submit(state),

        // ===== Load =====
        Action::LoadDidComplete(batch) => {
            if !state.loading {
                return DispatchResult::unchanged();
            }
            apply_batch(state, batch)
        }

        Action::LoadDidError(_) => {
            if !state.loading {
                return DispatchResult::unchanged();
            }
            state.loading = false;
            state.screen = Screen::Select;
            state.alert = Some(ALERT_LOAD_FAILED.to_string());
            DispatchResult::changed()
        }

        Action::LoadCancel => {
            if !state.loading {
                return DispatchResult::unchanged();
            }
            state.loading = false;
            state.message = Some("Load cancelled.".to_string());
            DispatchResult::changed_with(Effect::CancelLoad)
        }

        // ===== Navigation =====
        Action::CursorNext => {
            if state.screen != Screen::Results || !state.collection.advance() {
                return DispatchResult::unchanged();
            }
            changed_with_artwork(state)
        }

        Action::CursorPrev => {
            if state.screen != Screen::Results || !state.collection.retreat() {
                return DispatchResult::unchanged();
            }
            changed_with_artwork(state)
        }

        // ===== Moves modal =====
        Action::MovesOpen => {
            if state.moves_open || state.current().is_none() {
                return DispatchResult::unchanged();
            }
            state.moves_open = true;
            DispatchResult::changed()
        }

        Action::MovesClose => {
            if !state.moves_open {
                return DispatchResult::unchanged();
            }
            state.moves_open = false;
            DispatchResult::changed()
        }

        Action::SearchAnother => {
            if state.screen == Screen::Select {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::Select;
            state.moves_open = false;
            DispatchResult::changed()
        }

        Action::ResultsResume => {
            if state.screen == Screen::Results || state.loading || state.collection.is_empty() {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::Results;
            DispatchResult::changed()
        }

        Action::AlertDismiss => {
            if state.alert.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::ArtworkDidLoad { name, artwork } => {
            if !state.collection.items().iter().any(|p| p.name == name) {
                return DispatchResult::unchanged();
            }
            state.artwork.insert(name, artwork);
            DispatchResult::changed()
        }

        Action::ArtworkDidError { name, error } => {
            if !state.collection.items().iter().any(|p| p.name == name) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Artwork for {name} unavailable: {error}"));
            DispatchResult::changed()
        }

        Action::Tick => {
            if !state.loading {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn submit(state: &mut AppState) -> DispatchResult<Effect> {
    if state.loading {
        return DispatchResult::unchanged();
    }
    let Some(category) = state.form.category() else {
        state.alert = Some(ALERT_NO_CATEGORY.to_string());
        return DispatchResult::changed();
    };
    let Some(count) = state.form.count() else {
        state.alert = Some(ALERT_BAD_COUNT.to_string());
        return DispatchResult::changed();
    };

    // Emptied before the request goes out so a failure never shows a stale batch.
    state.collection.clear();
    state.artwork.clear();
    state.artwork_requested.clear();
    state.last_report = None;
    state.moves_open = false;
    state.message = None;
    state.alert = None;
    state.loading = true;
    state.tick = 0;
    DispatchResult::changed_with(Effect::LoadCategory {
        api_base: state.api_base.clone(),
        category: category.to_string(),
        count,
    })
}

fn apply_batch(state: &mut AppState, batch: LoadedBatch) -> DispatchResult<Effect> {
    state.loading = false;
    state.collection.replace(batch.items);
    state.message = Some(batch.report.summary());
    state.last_report = Some(batch.report);

    if state.collection.is_empty() {
        state.screen = Screen::Select;
        state.alert = Some(ALERT_NOTHING_LOADED.to_string());
        return DispatchResult::changed();
    }

    state.screen = Screen::Results;
    changed_with_artwork(state)
}

/// Start artwork downloads for cards near the cursor that don't have one yet.
fn changed_with_artwork(state: &mut AppState) -> DispatchResult<Effect> {
    let cursor = state.collection.cursor();
    let first = cursor.saturating_sub(ARTWORK_WINDOW);
    let mut effects = Vec::new();
    for pokemon in state
        .collection
        .items()
        .iter()
        .skip(first)
        .take(cursor - first + ARTWORK_WINDOW + 1)
    {
        let Some(url) = &pokemon.image else {
            continue;
        };
        if state.artwork_requested.insert(pokemon.name.clone()) {
            effects.push(Effect::LoadArtwork {
                name: pokemon.name.clone(),
                url: url.clone(),
            });
        }
    }
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}
