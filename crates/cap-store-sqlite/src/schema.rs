//! SQL schema for the CAP SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS goals (
    goal_id     TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    name        TEXT NOT NULL,
    metric_type TEXT NOT NULL,   -- 'percentage' | 'scale_5' | 'numeric'
    unit        TEXT,
    created_at  TEXT NOT NULL
);

-- Events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table. `seq` preserves
-- insertion order for events sharing a timestamp.
CREATE TABLE IF NOT EXISTS events (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id    TEXT NOT NULL UNIQUE,
    goal_id     TEXT NOT NULL REFERENCES goals(goal_id),
    actor_id    TEXT NOT NULL,
    value       REAL NOT NULL,
    occurred_at TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    source      TEXT NOT NULL CHECK (source IN ('self', 'peer'))
);

CREATE INDEX IF NOT EXISTS goals_owner_idx      ON goals(owner_id);
CREATE INDEX IF NOT EXISTS events_goal_time_idx ON events(goal_id, occurred_at);

PRAGMA user_version = 1;
";
