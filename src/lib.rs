//! Pokedeck - browse Pokemon by type, one card at a time
//!
//! The library holds the catalog client, the loader and the store pieces;
//! the binary wires them into the terminal UI.

pub mod action;
pub mod api;
pub mod artwork;
pub mod collection;
pub mod components;
pub mod effect;
pub mod error;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod reducer;
pub mod state;
