//! Table definitions, applied idempotently at startup.
//!
//! `polls_choice.question_id` cascades on delete so the store itself removes a question's
//! choices; the admin delete path also removes them explicitly inside its transaction.
//!
//! `polls_question.search_text` holds the Unicode-lowercased question text. Searches match it
//! with `LIKE`, since SQLite's own `LOWER()` only folds ASCII.

pub const POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS polls_question (
    id BIGSERIAL PRIMARY KEY,
    question_text VARCHAR(200) NOT NULL,
    search_text TEXT NOT NULL,
    pub_date TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS polls_choice (
    id BIGSERIAL PRIMARY KEY,
    question_id BIGINT NOT NULL REFERENCES polls_question (id) ON DELETE CASCADE,
    choice_text VARCHAR(200) NOT NULL,
    votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
);

CREATE INDEX IF NOT EXISTS polls_choice_question_id_idx ON polls_choice (question_id);
CREATE INDEX IF NOT EXISTS polls_question_pub_date_idx ON polls_question (pub_date);
"#;

pub const SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS polls_question (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_text VARCHAR(200) NOT NULL,
    search_text TEXT NOT NULL,
    pub_date DATETIME NOT NULL
);

CREATE TABLE IF NOT EXISTS polls_choice (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL REFERENCES polls_question (id) ON DELETE CASCADE,
    choice_text VARCHAR(200) NOT NULL,
    votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
);

CREATE INDEX IF NOT EXISTS polls_choice_question_id_idx ON polls_choice (question_id);
CREATE INDEX IF NOT EXISTS polls_question_pub_date_idx ON polls_question (pub_date);
"#;
