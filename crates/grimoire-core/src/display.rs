//! The spell table engine: search, tab filter, sort and annotate.
//!
//! Pipeline (each stage total, always in this order):
//!   catalog
//!     └─ search filter (case-insensitive over the JSON form)
//!          └─ tab filter (only with a character)
//!               └─ stable sort by level
//!                    └─ known / prepared annotation

use serde::{Deserialize, Serialize};

use crate::{Result, character::Character, lists::SpellListType, spell::Spell};

/// A catalog spell annotated with the viewing character's list state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedSpell {
  #[serde(flatten)]
  pub spell:    Spell,
  pub known:    bool,
  pub prepared: bool,
}

fn passes_tab(spell: &Spell, character: &Character, tab: SpellListType) -> bool {
  match tab {
    SpellListType::All => true,
    SpellListType::Class => spell.available_to(character.class_names()),
    SpellListType::Known => character.knows(&spell.index),
    SpellListType::Prepared => character.has_prepared(&spell.index),
  }
}

/// Compute the rows of the spell table.
///
/// Without a character no tab filtering happens and every row is annotated
/// `known = prepared = false`. Spells of equal level keep their catalog
/// order.
pub fn displayed_spells(
  spells: &[Spell],
  character: Option<&Character>,
  active_tab: SpellListType,
  search_text: &str,
) -> Result<Vec<DisplayedSpell>> {
  let mut rows: Vec<&Spell> = Vec::with_capacity(spells.len());
  for spell in spells {
    if !spell.matches_text(search_text)? {
      continue;
    }
    if let Some(character) = character
      && !passes_tab(spell, character, active_tab)
    {
      continue;
    }
    rows.push(spell);
  }

  // `sort_by_key` is stable.
  rows.sort_by_key(|spell| spell.level);

  Ok(
    rows
      .into_iter()
      .map(|spell| DisplayedSpell {
        spell:    spell.clone(),
        known:    character.is_some_and(|c| c.knows(&spell.index)),
        prepared: character.is_some_and(|c| c.has_prepared(&spell.index)),
      })
      .collect(),
  )
}
