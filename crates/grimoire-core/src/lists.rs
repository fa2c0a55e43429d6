//! Derived spell lists and the tabs that present them.
//!
//! Whether a character keeps a "Known" and/or "Prepared" list depends only on
//! its classes, through a fixed partition of the class taxonomy. The actual
//! list contents live on the [`Character`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::character::{Character, CharacterClassName};

/// Classes that permanently learn spells from a limited pool.
pub const KNOWN_LIST_CLASSES: [CharacterClassName; 5] = [
  CharacterClassName::Wizard,
  CharacterClassName::Warlock,
  CharacterClassName::Bard,
  CharacterClassName::Ranger,
  CharacterClassName::Sorcerer,
];

/// Classes that prepare a daily selection. Wizards appear in both lists:
/// the spellbook is their known list.
pub const PREPARED_LIST_CLASSES: [CharacterClassName; 4] = [
  CharacterClassName::Druid,
  CharacterClassName::Cleric,
  CharacterClassName::Paladin,
  CharacterClassName::Wizard,
];

/// One of the four spell tabs.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum SpellListType {
  All,
  #[default]
  Class,
  Known,
  Prepared,
}

/// Which optional lists a character keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellLists {
  pub known:    bool,
  pub prepared: bool,
}

impl SpellLists {
  pub fn contains(&self, list: SpellListType) -> bool {
    match list {
      SpellListType::All | SpellListType::Class => true,
      SpellListType::Known => self.known,
      SpellListType::Prepared => self.prepared,
    }
  }
}

/// Classify a set of classes into the optional lists they grant.
pub fn classify_lists<I>(classes: I) -> SpellLists
where
  I: IntoIterator<Item = CharacterClassName>,
{
  classes.into_iter().fold(SpellLists::default(), |lists, class| SpellLists {
    known:    lists.known || KNOWN_LIST_CLASSES.contains(&class),
    prepared: lists.prepared || PREPARED_LIST_CLASSES.contains(&class),
  })
}

/// The tabs to show for `character` while `active` is selected, in display
/// order.
pub fn available_tabs(character: &Character, active: SpellListType) -> Vec<SpellListType> {
  let lists = classify_lists(character.class_names());
  let mut tabs = Vec::with_capacity(4);
  if lists.prepared {
    tabs.push(SpellListType::Prepared);
  }
  if lists.known && active != SpellListType::Prepared {
    tabs.push(SpellListType::Known);
  }
  tabs.push(SpellListType::Class);
  tabs.push(SpellListType::All);
  tabs
}

/// Resolve a requested tab (e.g. from a deep link) against the lists the
/// character actually keeps; unsupported requests fall back to the default.
pub fn resolve_tab(requested: SpellListType, lists: SpellLists) -> SpellListType {
  if lists.contains(requested) {
    requested
  } else {
    SpellListType::default()
  }
}

/// Which per-spell checkboxes to render on a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleVisibility {
  pub known:    bool,
  pub prepared: bool,
}

pub fn toggle_visibility(tab: SpellListType, lists: SpellLists) -> ToggleVisibility {
  ToggleVisibility {
    known:    tab != SpellListType::Prepared && lists.known,
    prepared: (tab == SpellListType::Known
      || tab == SpellListType::Prepared
      || !lists.known)
      && lists.prepared,
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;
  use crate::character::test_helpers::character;
  use CharacterClassName::*;

  #[test]
  fn wizard_keeps_both_lists() {
    assert_eq!(classify_lists([Wizard]), SpellLists { known: true, prepared: true });
  }

  #[test]
  fn single_class_partition() {
    for class in CharacterClassName::iter() {
      let lists = classify_lists([class]);
      assert_eq!(lists.known, matches!(class, Wizard | Warlock | Bard | Ranger | Sorcerer));
      assert_eq!(lists.prepared, matches!(class, Druid | Cleric | Paladin | Wizard));
    }
  }

  #[test]
  fn classification_ignores_order() {
    let forward = classify_lists([Bard, Cleric]);
    let backward = classify_lists([Cleric, Bard]);
    assert_eq!(forward, backward);
    assert_eq!(forward, SpellLists { known: true, prepared: true });
  }

  #[test]
  fn no_classes_means_no_optional_lists() {
    let lists = classify_lists(std::iter::empty());
    assert_eq!(lists, SpellLists::default());
    assert!(lists.contains(SpellListType::Class));
    assert!(lists.contains(SpellListType::All));
    assert!(!lists.contains(SpellListType::Known));
  }

  #[test]
  fn tab_order_and_gating() {
    let wizard = character(&[Wizard]);
    assert_eq!(
      available_tabs(&wizard, SpellListType::Class),
      vec![
        SpellListType::Prepared,
        SpellListType::Known,
        SpellListType::Class,
        SpellListType::All,
      ]
    );
    assert_eq!(
      available_tabs(&wizard, SpellListType::Prepared),
      vec![SpellListType::Prepared, SpellListType::Class, SpellListType::All]
    );

    let warlock = character(&[Warlock]);
    assert_eq!(
      available_tabs(&warlock, SpellListType::Class),
      vec![SpellListType::Known, SpellListType::Class, SpellListType::All]
    );
  }

  #[test]
  fn unsupported_tab_falls_back_to_class() {
    let cleric = classify_lists([Cleric]);
    assert_eq!(resolve_tab(SpellListType::Known, cleric), SpellListType::Class);
    assert_eq!(resolve_tab(SpellListType::Prepared, cleric), SpellListType::Prepared);
    assert_eq!(resolve_tab(SpellListType::All, cleric), SpellListType::All);
  }

  #[test]
  fn checkbox_visibility() {
    let both = classify_lists([Wizard]);
    assert_eq!(
      toggle_visibility(SpellListType::Class, both),
      ToggleVisibility { known: true, prepared: false }
    );
    assert_eq!(
      toggle_visibility(SpellListType::Known, both),
      ToggleVisibility { known: true, prepared: true }
    );
    assert_eq!(
      toggle_visibility(SpellListType::Prepared, both),
      ToggleVisibility { known: false, prepared: true }
    );

    let cleric = classify_lists([Cleric]);
    assert_eq!(
      toggle_visibility(SpellListType::All, cleric),
      ToggleVisibility { known: false, prepared: true }
    );

    let bard = classify_lists([Bard]);
    assert_eq!(
      toggle_visibility(SpellListType::All, bard),
      ToggleVisibility { known: true, prepared: false }
    );
  }

  #[test]
  fn tab_names_parse_loosely() {
    assert_eq!("prepared".parse::<SpellListType>().unwrap(), SpellListType::Prepared);
    assert_eq!(SpellListType::Known.to_string(), "Known");
  }
}
