use crate::core::models::choice::{Change as ChoiceChange, Choice};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const QUESTION_TEXT_MAX_LENGTH: usize = 200;

/// Case-folded form of `text` that searches compare against. Stores keep a copy of it next to
/// the question text.
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    pub fn was_published_recently(&self) -> bool {
        self.was_published_recently_at(Utc::now())
    }

    /// True when `pub_date` falls within the day leading up to `now`. Future dates never count.
    pub fn was_published_recently_at(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithChoices {
    pub question: Question,
    pub choices: Vec<Choice>,
}

impl QuestionWithChoices {
    pub fn total_votes(&self) -> i64 {
        self.choices.iter().map(|c| i64::from(c.votes)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

/// A validated admin submission: the question fields plus the edits to its choices.
#[derive(Debug, Clone)]
pub struct Edit {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub choices: Vec<ChoiceChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    PubDateDesc,
    PubDateAsc,
    TextAsc,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Whitespace separated terms, each matched case-insensitively against the text.
    pub text_contains: Option<String>,
    pub published_at_or_before: Option<DateTime<Utc>>,
    /// Half-open `[from, to)` publication window.
    pub published_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub ordering: Ordering,
}

impl Query {
    pub fn search_terms(&self) -> Vec<String> {
        self.text_contains
            .as_deref()
            .map(|s| s.split_whitespace().map(search_key).collect())
            .unwrap_or_default()
    }
}
