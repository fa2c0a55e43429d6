//! JSON import/export for Grimoire.
//!
//! Converts between exported documents (`spells.json`, `character.json`) and
//! [`grimoire_core`] domain types. Pure synchronous; no storage dependencies.
//!
//! Every import path validates strictly: a batch is accepted whole or
//! rejected whole.
//!
//! # Quick start
//!
//! ```no_run
//! let json = std::fs::read_to_string("spells.json").unwrap();
//! let spells = grimoire_transfer::import_spells(&json).unwrap();
//! println!("{} spells", spells.len());
//! ```

mod character;
pub mod error;
mod spells;

pub use character::{export_character, import_character};
pub use error::{Error, Result};
pub use spells::{export_spells, import_spells};

/// Default file name for an exported spell catalog.
pub const SPELLS_FILE_NAME: &str = "spells.json";

/// Default file name for an exported character.
pub const CHARACTER_FILE_NAME: &str = "character.json";
