//! Database schema and migrations for msgboard.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: threads with their replies embedded as a JSON document
    r#"
CREATE TABLE threads (
    id               TEXT PRIMARY KEY,          -- UUID v4
    board            TEXT NOT NULL,
    text             TEXT NOT NULL,
    delete_password  TEXT NOT NULL,             -- Argon2 hash
    created_on       TEXT NOT NULL,
    bumped_on        TEXT NOT NULL,
    reported         INTEGER NOT NULL DEFAULT 0,
    replies          TEXT NOT NULL DEFAULT '[]',
    version          INTEGER NOT NULL DEFAULT 0  -- bumped on every write
);

CREATE INDEX idx_threads_board_bumped_on ON threads(board, bumped_on DESC);
"#,
];
