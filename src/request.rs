//! Typed parsing of submitted forms. Everything a handler needs from a request body is
//! turned into one of these values before any business logic runs.

use crate::core::models::{
    choice::{Change as ChoiceChange, Choice, CHOICE_TEXT_MAX_LENGTH},
    question::{Edit, QuestionWithChoices, QUESTION_TEXT_MAX_LENGTH},
    vote::Selection,
};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const REQUIRED: &str = "This field is required.";
pub const INLINE_PREFIX: &str = "choice_set";
/// Upper bound on inline rows accepted from one submission.
pub const MAX_INLINE_FORMS: usize = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    /// Bodies that are not valid URL-encoded data carry no selection.
    pub fn from_body(body: &[u8]) -> Self {
        serde_urlencoded::from_bytes(body).unwrap_or_default()
    }
}

impl From<VoteForm> for Selection {
    fn from(form: VoteForm) -> Self {
        match form.choice {
            None => Selection::Missing,
            Some(raw) if raw.trim().is_empty() => Selection::Missing,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(id) => Selection::Choice(id),
                Err(_) => Selection::Invalid(raw),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeListParams {
    pub q: Option<String>,
    pub pub_date: Option<String>,
    pub p: Option<String>,
}

impl ChangeListParams {
    pub fn page(&self) -> i64 {
        self.p.as_deref().and_then(|p| p.trim().parse::<i64>().ok()).filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn search(&self) -> Option<String> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()).map(str::to_owned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Save,
    Continue,
    AddAnother,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChoiceRow {
    pub id: Option<i64>,
    pub choice_text: String,
    pub votes: Option<i32>,
    pub delete: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormErrors {
    pub question_text: Vec<String>,
    pub pub_date: Vec<String>,
    pub choices: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.question_text.is_empty() && self.pub_date.is_empty() && self.choices.is_empty()
    }
}

/// Raw state of the question change form, as rendered and as submitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionForm {
    pub question_text: String,
    pub pub_date_date: String,
    pub pub_date_time: String,
    pub choices: Vec<ChoiceRow>,
    pub errors: FormErrors,
    pub has_errors: bool,
}

impl QuestionForm {
    pub fn blank(extra: usize) -> Self {
        Self {
            choices: vec![ChoiceRow::default(); extra],
            ..Default::default()
        }
    }

    pub fn from_question(question: &QuestionWithChoices, tz: &Tz, extra: usize) -> Self {
        let local = question.question.pub_date.with_timezone(tz);
        let mut choices: Vec<ChoiceRow> = question
            .choices
            .iter()
            .map(|c| ChoiceRow {
                id: Some(c.id),
                choice_text: c.choice_text.clone(),
                votes: Some(c.votes),
                ..Default::default()
            })
            .collect();
        choices.extend(std::iter::repeat(ChoiceRow::default()).take(extra));
        Self {
            question_text: question.question.question_text.clone(),
            pub_date_date: local.format("%Y-%m-%d").to_string(),
            pub_date_time: local.format("%H:%M:%S").to_string(),
            choices,
            ..Default::default()
        }
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> (Self, SubmitAction) {
        let action = if pairs.iter().any(|(k, _)| k == "_continue") {
            SubmitAction::Continue
        } else if pairs.iter().any(|(k, _)| k == "_addanother") {
            SubmitAction::AddAnother
        } else {
            SubmitAction::Save
        };
        let fields: HashMap<String, String> = pairs.into_iter().collect();
        let field = |name: &str| fields.get(name).cloned().unwrap_or_default();
        let mut form = Self {
            question_text: field("question_text"),
            pub_date_date: field("pub_date_0"),
            pub_date_time: field("pub_date_1"),
            ..Default::default()
        };
        match fields.get(&format!("{}-TOTAL_FORMS", INLINE_PREFIX)).map(|v| v.trim().parse::<usize>()) {
            Some(Ok(total)) if total <= MAX_INLINE_FORMS => {
                for i in 0..total {
                    let key = |name: &str| format!("{}-{}-{}", INLINE_PREFIX, i, name);
                    form.choices.push(ChoiceRow {
                        id: fields.get(&key("id")).and_then(|v| v.trim().parse::<i64>().ok()),
                        choice_text: field(&key("choice_text")),
                        votes: None,
                        delete: fields.get(&key("DELETE")).map(|v| !v.is_empty() && v != "off" && v != "false").unwrap_or(false),
                        errors: Vec::new(),
                    });
                }
            }
            Some(Ok(_)) => form.errors.choices.push(format!("Please submit at most {} forms.", MAX_INLINE_FORMS)),
            _ => form.errors.choices.push("ManagementForm data is missing or has been tampered with.".into()),
        }
        (form, action)
    }

    /// Copies current vote counts onto existing rows for display.
    pub fn fill_votes(&mut self, choices: &[Choice]) {
        for row in self.choices.iter_mut() {
            if let Some(id) = row.id {
                row.votes = choices.iter().find(|c| c.id == id).map(|c| c.votes);
            }
        }
    }

    /// Checks every field. Errors are recorded on the form itself; a valid form yields the edit to apply.
    pub fn validate(&mut self, tz: &Tz) -> Option<Edit> {
        let question_text = self.question_text.trim().to_owned();
        if question_text.is_empty() {
            self.errors.question_text.push(REQUIRED.into());
        } else if question_text.chars().count() > QUESTION_TEXT_MAX_LENGTH {
            self.errors.question_text.push(too_long(QUESTION_TEXT_MAX_LENGTH, question_text.chars().count()));
        }
        let pub_date = match parse_local_datetime(&self.pub_date_date, &self.pub_date_time, tz) {
            Ok(dt) => Some(dt),
            Err(e) => {
                self.errors.pub_date.push(e);
                None
            }
        };
        let mut changes = Vec::new();
        let mut row_errors = false;
        for row in self.choices.iter_mut() {
            let text = row.choice_text.trim().to_owned();
            match (row.id, row.delete) {
                (Some(id), true) => changes.push(ChoiceChange::Delete { id }),
                (None, true) => {}
                (None, false) if text.is_empty() => {}
                (id, false) => {
                    if text.is_empty() {
                        row.errors.push(REQUIRED.into());
                    } else if text.chars().count() > CHOICE_TEXT_MAX_LENGTH {
                        row.errors.push(too_long(CHOICE_TEXT_MAX_LENGTH, text.chars().count()));
                    }
                    if !row.errors.is_empty() {
                        row_errors = true;
                        continue;
                    }
                    changes.push(match id {
                        Some(id) => ChoiceChange::Rename { id, choice_text: text },
                        None => ChoiceChange::Create { choice_text: text },
                    });
                }
            }
        }
        self.has_errors = !self.errors.is_empty() || row_errors;
        match pub_date {
            Some(pub_date) if !self.has_errors => Some(Edit {
                question_text,
                pub_date,
                choices: changes,
            }),
            _ => None,
        }
    }
}

fn too_long(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {} characters (it has {}).", max, actual)
}

/// Interprets a split date/time input in `tz`. Ambiguous or skipped wall-clock times are rejected.
pub fn parse_local_datetime(date: &str, time: &str, tz: &Tz) -> Result<DateTime<Utc>, String> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() || time.is_empty() {
        return Err(REQUIRED.into());
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| "Enter a valid date.".to_string())?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| "Enter a valid time.".to_string())?;
    match tz.from_local_datetime(&NaiveDateTime::new(date, time)) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        _ => Err(format!(
            "{} {} couldn't be interpreted in time zone {}; it may be ambiguous or it may not exist.",
            date,
            time,
            tz.name()
        )),
    }
}
