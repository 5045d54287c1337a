//! Database schema and migrations for Mailroom.
//!
//! Migrations are applied in order when the database is opened.
//! The schema_version table tracks which migrations have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL          -- Argon2id PHC string
);
"#,
    // v2: messages (immutable content, shared by both mailboxes)
    r#"
CREATE TABLE messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject     TEXT NOT NULL,
    body        TEXT NOT NULL,
    sender_id   INTEGER NOT NULL REFERENCES users(id),
    receiver_id INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL
);

CREATE INDEX idx_messages_sender_id ON messages(sender_id);
CREATE INDEX idx_messages_receiver_id ON messages(receiver_id);
"#,
    // v3: listings (mailbox projection; no cascades in either direction)
    r#"
CREATE TABLE listings (
    kind        TEXT NOT NULL CHECK (kind IN ('inbox', 'outbox')),
    user_id     INTEGER NOT NULL REFERENCES users(id),
    message_id  INTEGER NOT NULL REFERENCES messages(id),
    PRIMARY KEY (kind, user_id, message_id)
);

CREATE INDEX idx_listings_message_id ON listings(message_id);
"#,
];
