//! Plain-text rendering for command output.

use std::fmt::Write as _;

use grimoire_core::{character::Character, slots::SpellSlots};
use grimoire_service::SpellView;

/// `<uuid>  <name>  (<Class> <level>, ...)`
pub fn character_line(character: &Character) -> String {
  let classes = character
    .classes
    .iter()
    .map(|c| format!("{} {}", c.name, c.level))
    .collect::<Vec<_>>()
    .join(", ");
  format!("{}  {}  ({classes})", character.uuid, character.name)
}

/// One line per populated level: `L3  [x][x][ ]  1/3`.
pub fn slots(slots: &SpellSlots) -> String {
  let mut out = String::new();
  for row in slots.iter().filter(|row| row.available > 0) {
    let boxes: String = (1..=row.available)
      .map(|p| if slots.slot_checked(row.level, p) { "[x]" } else { "[ ]" })
      .collect();
    let _ = writeln!(out, "L{}  {boxes}  {} left", row.level, row.remaining());
  }
  if out.is_empty() {
    out.push_str("no spell slots\n");
  }
  out
}

/// The tab bar followed by the spell table.
pub fn spell_view(view: &SpellView) -> String {
  let mut out = String::new();
  let tabs = view
    .tabs
    .iter()
    .map(|tab| {
      if *tab == view.active_tab {
        format!("[{tab}]")
      } else {
        tab.to_string()
      }
    })
    .collect::<Vec<_>>()
    .join(" ");
  let _ = writeln!(out, "{tabs}");

  for row in &view.spells {
    let mut marks = String::new();
    if view.toggles.known {
      marks.push_str(if row.known { "K" } else { "-" });
    }
    if view.toggles.prepared {
      marks.push_str(if row.prepared { "P" } else { "-" });
    }
    let level = if row.spell.is_cantrip() {
      "cantrip".to_owned()
    } else {
      format!("level {}", row.spell.level)
    };
    let _ = writeln!(
      out,
      "{marks:<2} {:<28} {level:<8} {}",
      row.spell.name, row.spell.school
    );
  }
  if view.spells.is_empty() {
    out.push_str("no spells\n");
  }
  out
}
