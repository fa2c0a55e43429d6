//! `grimoire`: command-line driver for the Grimoire character sheets.
//!
//! Reads `grimoire.toml` (or the path given with `--config`), opens the
//! SQLite store and runs one command against it.
//!
//! # Usage
//!
//! ```text
//! grimoire import-spells 5e-SRD-Spells.json
//! grimoire create Elminster --class Wizard:5
//! grimoire spells <uuid> --tab known --search fire
//! ```

mod config;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use base64::Engine as _;
use clap::{Parser, Subcommand};
use grimoire_core::{
  character::{Character, CharacterClass, parse_class_name},
  lists::SpellListType,
  settings::{ColorTheme, PrimaryTheme},
};
use grimoire_service::{Grimoire, ImportMode};
use grimoire_store_sqlite::SqliteStore;
use grimoire_transfer::{CHARACTER_FILE_NAME, SPELLS_FILE_NAME};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::AppConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "grimoire", version, about = "Spellcaster character sheets")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "grimoire.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load a spell catalog from a JSON array.
  ImportSpells {
    file:  PathBuf,
    /// Upsert into the existing catalog instead of replacing it.
    #[arg(long)]
    merge: bool,
  },
  /// Write the spell catalog as JSON.
  ExportSpells { file: Option<PathBuf> },
  /// Load (or overwrite) a character from an exported document.
  ImportCharacter { file: PathBuf },
  /// Write one character as JSON.
  ExportCharacter { uuid: Uuid, file: Option<PathBuf> },
  /// Create a character. Classes are given as `Class` or `Class:level`.
  Create {
    name:    String,
    #[arg(long = "class", required = true, value_parser = parse_class_arg)]
    classes: Vec<CharacterClass>,
  },
  /// List every character.
  List,
  /// Show the spell table of a character.
  Spells {
    uuid:   Uuid,
    #[arg(long, default_value_t = SpellListType::Class)]
    tab:    SpellListType,
    #[arg(long, default_value = "")]
    search: String,
  },
  Delete { uuid: Uuid },
  Rename { uuid: Uuid, name: String },
  /// Set the portrait from a PNG file, or clear it when no file is given.
  SetImage { uuid: Uuid, png: Option<PathBuf> },
  ToggleKnown { uuid: Uuid, index: String },
  TogglePrepared { uuid: Uuid, index: String },
  /// Show the spell-slot table.
  Slots { uuid: Uuid },
  AddSlot { uuid: Uuid, level: u8 },
  RemoveSlot { uuid: Uuid, level: u8 },
  /// Click the slot checkbox at `ordinal` (1-based).
  ToggleSlot {
    uuid:    Uuid,
    level:   u8,
    ordinal: u8,
    /// Uncheck the box instead of checking it.
    #[arg(long)]
    clear:   bool,
  },
  /// Zero every slot at or above the highest populated level.
  DropLevel { uuid: Uuid },
  /// Reset every used slot.
  LongRest { uuid: Uuid },
  /// Show or change the theme preferences.
  Theme {
    #[arg(long)]
    color:   Option<ColorTheme>,
    #[arg(long)]
    primary: Option<PrimaryTheme>,
  },
}

fn parse_class_arg(s: &str) -> Result<CharacterClass, String> {
  let (name, level) = match s.split_once(':') {
    Some((name, level)) => {
      let level = level
        .parse()
        .map_err(|_| format!("invalid class level {level:?}"))?;
      (name, level)
    }
    None => (s, 1),
  };
  let name = parse_class_name(name).map_err(|e| e.to_string())?;
  Ok(CharacterClass::new(name, level))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let grimoire = Grimoire::open(store)
    .await
    .context("failed to load stored state")?;

  run(&grimoire, cli.command).await
}

async fn run(g: &Grimoire<SqliteStore>, command: Command) -> anyhow::Result<()> {
  match command {
    Command::ImportSpells { file, merge } => {
      let raw = read(&file)?;
      let spells = grimoire_transfer::import_spells(&raw)
        .with_context(|| format!("Invalid JSON file {}", file.display()))?;
      let count = spells.len();
      let mode = if merge { ImportMode::Merge } else { ImportMode::Replace };
      let total = g.catalog.import(spells, mode).await?;
      println!("imported {count} spells ({total} in catalog)");
    }
    Command::ExportSpells { file } => {
      let path = file.unwrap_or_else(|| PathBuf::from(SPELLS_FILE_NAME));
      let json = grimoire_transfer::export_spells(&g.catalog.snapshot())?;
      write(&path, &json)?;
      println!("wrote {}", path.display());
    }
    Command::ImportCharacter { file } => {
      let raw = read(&file)?;
      let character = grimoire_transfer::import_character(&raw)
        .with_context(|| format!("Invalid JSON file {}", file.display()))?;
      g.characters.upsert(character.clone()).await?;
      println!("{}", render::character_line(&character));
    }
    Command::ExportCharacter { uuid, file } => {
      let character = existing(g, uuid).await?;
      let path = file.unwrap_or_else(|| PathBuf::from(CHARACTER_FILE_NAME));
      write(&path, &grimoire_transfer::export_character(&character)?)?;
      println!("wrote {}", path.display());
    }
    Command::Create { name, classes } => {
      let character = g.characters.create(&name, classes).await?;
      println!("{}", render::character_line(&character));
    }
    Command::List => {
      for character in g.characters.snapshot() {
        println!("{}", render::character_line(&character));
      }
    }
    Command::Spells { uuid, tab, search } => {
      let view = g
        .spell_view(uuid, tab, &search)
        .await?
        .ok_or_else(|| anyhow!("no character {uuid}"))?;
      print!("{}", render::spell_view(&view));
    }
    Command::Delete { uuid } => {
      if !g.characters.remove(uuid).await? {
        return Err(anyhow!("no character {uuid}"));
      }
      println!("deleted {uuid}");
    }
    Command::Rename { uuid, name } => {
      let character = g.characters.rename(uuid, &name).await?;
      println!("{}", render::character_line(&character));
    }
    Command::SetImage { uuid, png } => {
      let image = match png {
        Some(path) => {
          let bytes =
            std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
          Some(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
          ))
        }
        None => None,
      };
      g.characters.set_image(uuid, image).await?;
    }
    Command::ToggleKnown { uuid, index } => {
      let character = g.characters.toggle_known(uuid, &index).await?;
      println!("{index}: {}", if character.knows(&index) { "known" } else { "not known" });
    }
    Command::TogglePrepared { uuid, index } => {
      let character = g.characters.toggle_prepared(uuid, &index).await?;
      let state = if character.has_prepared(&index) { "prepared" } else { "not prepared" };
      println!("{index}: {state}");
    }
    Command::Slots { uuid } => {
      print!("{}", render::slots(&existing(g, uuid).await?.spell_slots));
    }
    Command::AddSlot { uuid, level } => {
      print!("{}", render::slots(&g.characters.add_slot(uuid, level).await?.spell_slots));
    }
    Command::RemoveSlot { uuid, level } => {
      print!("{}", render::slots(&g.characters.remove_slot(uuid, level).await?.spell_slots));
    }
    Command::ToggleSlot { uuid, level, ordinal, clear } => {
      let character = g.characters.toggle_slot(uuid, level, ordinal, !clear).await?;
      print!("{}", render::slots(&character.spell_slots));
    }
    Command::DropLevel { uuid } => {
      let (character, max) = g.characters.drop_levels_from_max(uuid).await?;
      print!("{}", render::slots(&character.spell_slots));
      println!("max level {max}");
    }
    Command::LongRest { uuid } => {
      print!("{}", render::slots(&g.characters.long_rest(uuid).await?.spell_slots));
    }
    Command::Theme { color, primary } => {
      if let Some(color) = color {
        g.settings.set_color_theme(color).await?;
      }
      if let Some(primary) = primary {
        g.settings.set_primary_theme(primary).await?;
      }
      let theme = g.settings.theme();
      println!("color {}  primary {}", theme.color_theme, theme.primary_theme);
    }
  }
  Ok(())
}

async fn existing(g: &Grimoire<SqliteStore>, uuid: Uuid) -> anyhow::Result<Character> {
  g.characters
    .get_by_uuid(uuid)
    .await?
    .ok_or_else(|| anyhow!("no character {uuid}"))
}

fn read(path: &Path) -> anyhow::Result<String> {
  std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
  std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;
  use grimoire_core::character::CharacterClassName;

  use super::*;

  #[test]
  fn cli_definition_is_valid() { Cli::command().debug_assert(); }

  #[test]
  fn class_argument_forms() {
    let wizard = parse_class_arg("Wizard").unwrap();
    assert_eq!(wizard, CharacterClass::new(CharacterClassName::Wizard, 1));

    let cleric = parse_class_arg("Cleric:4").unwrap();
    assert_eq!(cleric, CharacterClass::new(CharacterClassName::Cleric, 4));

    assert!(parse_class_arg("Fighter").is_err());
    assert!(parse_class_arg("Bard:x").is_err());
  }

  #[test]
  fn spells_command_parses_tab_case_insensitively() {
    let cli = Cli::try_parse_from([
      "grimoire",
      "spells",
      "5f1b7c1e-2d6a-4c8e-9a57-0e4b0b3c9d21",
      "--tab",
      "known",
    ])
    .unwrap();
    assert!(matches!(
      cli.command,
      Command::Spells { tab: SpellListType::Known, .. }
    ));
  }
}
