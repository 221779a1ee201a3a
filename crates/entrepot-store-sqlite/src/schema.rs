//! SQL schema for the Entrepot SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS aisles (
    aisle_id  INTEGER PRIMARY KEY,
    number    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS columns (
    column_id INTEGER PRIMARY KEY,
    number    INTEGER NOT NULL,
    aisle_id  INTEGER NOT NULL REFERENCES aisles(aisle_id)
);

CREATE TABLE IF NOT EXISTS slots (
    slot_id    INTEGER PRIMARY KEY,
    level      INTEGER NOT NULL CHECK (level BETWEEN 0 AND 3),
    max_volume INTEGER NOT NULL,
    max_weight INTEGER NOT NULL,
    column_id  INTEGER NOT NULL REFERENCES columns(column_id),
    UNIQUE (column_id, level)
);

CREATE TABLE IF NOT EXISTS packages (
    package_id INTEGER PRIMARY KEY,
    length     INTEGER NOT NULL,
    width      INTEGER NOT NULL,
    height     INTEGER NOT NULL,
    weight     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS carriers (
    carrier_id    INTEGER PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    born_on       TEXT NOT NULL,    -- ISO 8601 calendar date
    hired_on      TEXT NOT NULL,    -- ISO 8601 calendar date
    login         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL     -- argon2 PHC string
);

-- The placement ledger. Moves never rewrite prior rows; the only DELETE
-- ever issued here is the explicit remove_placement withdrawal. The
-- current location of a package is the newest row for its package_id
-- (deposited_at DESC, placement_id DESC).
CREATE TABLE IF NOT EXISTS placements (
    placement_id INTEGER PRIMARY KEY,
    carrier_id   INTEGER NOT NULL REFERENCES carriers(carrier_id),
    package_id   INTEGER NOT NULL REFERENCES packages(package_id),
    slot_id      INTEGER NOT NULL REFERENCES slots(slot_id),
    deposited_at TEXT NOT NULL     -- ISO 8601 UTC
);

CREATE INDEX IF NOT EXISTS columns_aisle_idx      ON columns(aisle_id);
CREATE INDEX IF NOT EXISTS slots_column_idx       ON slots(column_id);
CREATE INDEX IF NOT EXISTS placements_package_idx ON placements(package_id, deposited_at);
CREATE INDEX IF NOT EXISTS placements_slot_idx    ON placements(slot_id);

PRAGMA user_version = 1;
";
