//! The spell-slot ledger.
//!
//! A [`SpellSlots`] table always holds exactly one [`SpellSlotLevel`] per
//! spell level `0..=9` with `used <= available`. Slots are only ever added
//! up to [`SLOT_CEILING`]. Operations return a new table; the
//! receiver is never modified.
//!
//! Level 0 (cantrips) is exempt from slot tracking and rejected by every
//! mutating operation.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  spell::{MAX_SPELL_LEVEL, check_level},
};

/// Most slots a single level can hold.
pub const SLOT_CEILING: u8 = 4;

/// Slot counters for one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlotLevel {
  pub level:     u8,
  pub available: u8,
  pub used:      u8,
}

impl SpellSlotLevel {
  pub fn empty(level: u8) -> Self { Self { level, available: 0, used: 0 } }

  pub fn remaining(&self) -> u8 { self.available.saturating_sub(self.used) }
}

/// The full ten-level slot table of a character.
///
/// Serialises as a plain array. Deserialisation goes through
/// [`SpellSlots::normalized`], so stored documents with missing, duplicate or
/// out-of-range rows still load into a valid table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SpellSlotLevel>", into = "Vec<SpellSlotLevel>")]
pub struct SpellSlots {
  levels: Vec<SpellSlotLevel>,
}

impl Default for SpellSlots {
  fn default() -> Self {
    Self {
      levels: (0..=MAX_SPELL_LEVEL).map(SpellSlotLevel::empty).collect(),
    }
  }
}

impl From<Vec<SpellSlotLevel>> for SpellSlots {
  fn from(levels: Vec<SpellSlotLevel>) -> Self { Self::normalized(levels) }
}

impl From<SpellSlots> for Vec<SpellSlotLevel> {
  fn from(slots: SpellSlots) -> Self { slots.levels }
}

impl SpellSlots {
  /// Build a table from arbitrary rows.
  ///
  /// The first row seen for each level wins; levels without a row are filled
  /// with zeroes and rows above level 9 are dropped. `used` is capped at
  /// `available`; `available` itself is kept as stored, so only
  /// [`SpellSlots::add_slot`] enforces [`SLOT_CEILING`]. Level 0 is always
  /// zero.
  pub fn normalized(rows: impl IntoIterator<Item = SpellSlotLevel>) -> Self {
    let mut table = Self::default();
    let mut seen = [false; MAX_SPELL_LEVEL as usize + 1];
    for row in rows {
      if row.level == 0 || row.level > MAX_SPELL_LEVEL {
        continue;
      }
      let idx = row.level as usize;
      if seen[idx] {
        continue;
      }
      seen[idx] = true;
      table.levels[idx] = SpellSlotLevel {
        level:     row.level,
        available: row.available,
        used:      row.used.min(row.available),
      };
    }
    table
  }

  pub fn iter(&self) -> impl Iterator<Item = &SpellSlotLevel> { self.levels.iter() }

  /// The row for `level`, or `None` if `level > 9`.
  pub fn get(&self, level: u8) -> Option<&SpellSlotLevel> {
    self.levels.get(level as usize)
  }

  /// Highest level with at least one available slot; 0 if there is none.
  pub fn max_level(&self) -> u8 {
    self
      .levels
      .iter()
      .filter(|row| row.available > 0)
      .map(|row| row.level)
      .max()
      .unwrap_or(0)
  }

  /// Whether the checkbox at 1-based `ordinal` is rendered checked.
  pub fn slot_checked(&self, level: u8, ordinal: u8) -> bool {
    self
      .get(level)
      .is_some_and(|row| ordinal >= 1 && ordinal <= row.used)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Add one available slot at `level`. Rejected at the ceiling.
  pub fn add_slot(&self, level: u8) -> Result<Self> {
    self.update(level, |row| {
      if row.available >= SLOT_CEILING {
        return Err(Error::SlotCeiling { level: row.level, ceiling: SLOT_CEILING });
      }
      row.available += 1;
      Ok(())
    })
  }

  /// Remove one available slot at `level`; a no-op when none are available.
  ///
  /// If every slot was used, `used` drops with `available`.
  pub fn remove_slot(&self, level: u8) -> Result<Self> {
    self.update(level, |row| {
      if row.available == 0 {
        return Ok(());
      }
      if row.used == row.available {
        row.used -= 1;
      }
      row.available -= 1;
      Ok(())
    })
  }

  /// Apply a click on the checkbox at 1-based `ordinal`.
  ///
  /// Slots fill as a contiguous prefix: checking box `n` marks slots `1..=n`
  /// used, unchecking box `n` leaves at most `n - 1` used. Checking a box
  /// that is already checked, or unchecking one that is already clear,
  /// leaves the row as it is.
  pub fn toggle_slot(&self, level: u8, ordinal: u8, checked: bool) -> Result<Self> {
    self.update(level, |row| {
      if ordinal == 0 || ordinal > row.available {
        return Err(Error::SlotOutOfRange {
          level: row.level,
          ordinal,
          available: row.available,
        });
      }
      row.used = if checked { row.used.max(ordinal) } else { row.used.min(ordinal - 1) };
      Ok(())
    })
  }

  /// Mark one more slot at `level` used, if any remain.
  pub fn spend_slot(&self, level: u8) -> Result<Self> {
    self.update(level, |row| {
      if row.used < row.available {
        row.used += 1;
      }
      Ok(())
    })
  }

  /// Refresh every level: `used = 0`, `available` untouched.
  pub fn long_rest(&self) -> Self {
    Self {
      levels: self
        .levels
        .iter()
        .map(|row| SpellSlotLevel { used: 0, ..*row })
        .collect(),
    }
  }

  /// The "remove level" control: zero every level at or above `max_level`.
  ///
  /// Returns the new table and the reduced maximum (`max_level - 1`,
  /// floored at 0).
  pub fn drop_levels_from(&self, max_level: u8) -> Result<(Self, u8)> {
    check_level(max_level)?;
    let levels = self
      .levels
      .iter()
      .map(|row| {
        if row.level < max_level {
          *row
        } else {
          SpellSlotLevel::empty(row.level)
        }
      })
      .collect();
    Ok((Self { levels }, max_level.saturating_sub(1)))
  }

  fn update<F>(&self, level: u8, f: F) -> Result<Self>
  where
    F: FnOnce(&mut SpellSlotLevel) -> Result<()>,
  {
    check_level(level)?;
    if level == 0 {
      return Err(Error::CantripLevel);
    }
    let mut next = self.clone();
    f(&mut next.levels[level as usize])?;
    debug_assert!(next.levels[level as usize].used <= next.levels[level as usize].available);
    Ok(next)
  }
}
