//! SQL schema for the Lorekeep SQLite store.
//!
//! Executed once at connection startup. Future migrations will be
//! gated on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS folders (
    folder_id   TEXT PRIMARY KEY,
    campaign_id TEXT NOT NULL,
    name        TEXT NOT NULL,
    parent_id   TEXT REFERENCES folders(folder_id),
    shared      INTEGER NOT NULL DEFAULT 0,
    deleted_at  TEXT             -- NULL means active
);

CREATE TABLE IF NOT EXISTS documents (
    doc_id      TEXT PRIMARY KEY,
    campaign_id TEXT NOT NULL,
    folder_id   TEXT REFERENCES folders(folder_id),
    title       TEXT NOT NULL,
    body        TEXT NOT NULL DEFAULT '',
    kind        TEXT NOT NULL DEFAULT 'normal',  -- 'normal' | 'index'
    shared      INTEGER NOT NULL DEFAULT 0,
    sort_index  INTEGER NOT NULL DEFAULT 0,
    updated_at  TEXT NOT NULL,                   -- ISO 8601 UTC
    deleted_at  TEXT
);

-- Derived rows: the full edge set for a from_doc is deleted and
-- reinserted on every save of that document's body.
CREATE TABLE IF NOT EXISTS edges (
    campaign_id TEXT NOT NULL,
    from_doc    TEXT NOT NULL REFERENCES documents(doc_id),
    to_doc      TEXT NOT NULL REFERENCES documents(doc_id),
    link_text   TEXT NOT NULL,
    kind        TEXT NOT NULL DEFAULT 'link',
    weight      INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (from_doc, to_doc)
);

-- Derived rows, replaced alongside edges.
CREATE TABLE IF NOT EXISTS tags (
    doc_id      TEXT NOT NULL REFERENCES documents(doc_id),
    campaign_id TEXT NOT NULL,
    namespace   TEXT NOT NULL,
    value       TEXT NOT NULL,
    PRIMARY KEY (doc_id, namespace, value)
);

-- Cross-reference rows from collaborator features (NPC profiles, map
-- pins). Purge deletes these before the document row.
CREATE TABLE IF NOT EXISTS refs (
    ref_id      TEXT PRIMARY KEY,
    campaign_id TEXT NOT NULL,
    doc_id      TEXT NOT NULL REFERENCES documents(doc_id),
    kind        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS docs_campaign_idx ON documents(campaign_id);
CREATE INDEX IF NOT EXISTS docs_folder_idx   ON documents(folder_id);
CREATE INDEX IF NOT EXISTS docs_title_idx    ON documents(campaign_id, title);
CREATE INDEX IF NOT EXISTS folders_campaign_idx ON folders(campaign_id);
CREATE INDEX IF NOT EXISTS edges_to_idx      ON edges(to_doc);
CREATE INDEX IF NOT EXISTS tags_lookup_idx   ON tags(campaign_id, namespace, value);
CREATE INDEX IF NOT EXISTS refs_doc_idx      ON refs(doc_id);

PRAGMA user_version = 1;
";
