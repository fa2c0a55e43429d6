//! SQL schema for the Grimoire SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per catalog spell; the document is the full Spell JSON.
CREATE TABLE IF NOT EXISTS spells (
    spell_index TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    level       INTEGER NOT NULL CHECK (level BETWEEN 0 AND 9),
    document    TEXT NOT NULL
);

-- Characters are replaced whole on every write; created_at survives replaces.
CREATE TABLE IF NOT EXISTS characters (
    uuid        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    document    TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC; first insert
    updated_at  TEXT NOT NULL    -- RFC 3339 UTC; last replace
);

CREATE TABLE IF NOT EXISTS global_settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS spells_level_idx       ON spells(level);
CREATE INDEX IF NOT EXISTS characters_created_idx ON characters(created_at);

PRAGMA user_version = 1;
";
