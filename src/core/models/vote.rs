use crate::core::models::question::QuestionWithChoices;

/// What a vote submission selected, decided before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Missing,
    Invalid(String),
    Choice(i64),
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Recorded,
    /// Nothing was written; carries the question so the form can be shown again.
    Rejected(QuestionWithChoices),
}
