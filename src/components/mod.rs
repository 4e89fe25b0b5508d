pub mod alert_modal;
pub mod moves_modal;
pub mod pokemon_card;
pub mod select_form;
pub mod theme;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use alert_modal::{AlertModal, AlertModalProps};
pub use moves_modal::{MovesModal, MovesModalProps};
pub use pokemon_card::{PokemonCard, PokemonCardProps};
pub use select_form::{SelectFormView, SelectFormProps};
