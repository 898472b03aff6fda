//! SQL schema for the jobtrack SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS jobs (
    id            TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL,
    company       TEXT NOT NULL CHECK (length(trim(company))  > 0),
    position      TEXT NOT NULL CHECK (length(trim(position)) > 0),
    status        TEXT NOT NULL DEFAULT 'applied'
                  CHECK (status IN ('applied', 'interviewing', 'offer', 'rejected', 'withdrawn')),
    applied_date  TEXT,            -- yyyy-mm-dd or NULL
    location      TEXT,
    salary_range  TEXT,
    job_url       TEXT,
    notes         TEXT,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond precision
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS jobs_owner_created_idx ON jobs(owner_id, created_at DESC);

PRAGMA user_version = 1;
";
