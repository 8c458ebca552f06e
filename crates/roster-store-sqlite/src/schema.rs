//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS countries (
    country_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS persons (
    person_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,   -- ISO 8601 calendar date
    country_id    TEXT REFERENCES countries(country_id),
    phone_number  TEXT NOT NULL DEFAULT '',
    address       TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS persons_country_idx ON persons(country_id);
CREATE INDEX IF NOT EXISTS persons_name_idx    ON persons(name);

PRAGMA user_version = 1;
";
