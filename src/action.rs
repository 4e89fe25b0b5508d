//! Actions: user intents and async results

use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::loader::LoadedBatch;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    // ===== Form =====
    FormCategorySelect(usize),
    FormCountChange(String),
    /// Validate the form and start a load
    FormSubmit,

    // ===== Load =====
    LoadDidComplete(LoadedBatch),
    LoadDidError(String),
    LoadCancel,

    // ===== Navigation =====
    CursorNext,
    CursorPrev,

    // ===== Moves modal =====
    MovesOpen,
    MovesClose,

    /// Back to the form, keeping the current batch
    SearchAnother,
    /// Back to the cards from the form
    ResultsResume,

    AlertDismiss,

    ArtworkDidLoad { name: String, artwork: Artwork },
    ArtworkDidError { name: String, error: String },

    Tick,
    Quit,
}
