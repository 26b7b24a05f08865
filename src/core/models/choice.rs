use serde::Serialize;
use sqlx::FromRow;

pub const CHOICE_TEXT_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i32,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i64,
    pub choice_text: String,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub choice_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub id: Option<i64>,
    pub question_id: Option<i64>,
}

/// One row of the inline choice editor, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Create { choice_text: String },
    Rename { id: i64, choice_text: String },
    Delete { id: i64 },
}
