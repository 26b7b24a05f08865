use crate::core::models::{
    choice::Query as ChoiceQuery,
    common::Pagination,
    question::{Query, Question, QuestionWithChoices},
};
use crate::core::ports::repository::{ChoiceCommon, QuestionCommon, Store};
use crate::error::Error;
use chrono::{DateTime, Utc};

pub const LATEST_QUESTIONS_LIMIT: i64 = 5;

/// Newest published questions first, at most five. Questions dated after `now` are not yet published.
pub async fn latest_questions<S>(storer: &mut S, now: DateTime<Utc>) -> Result<Vec<Question>, Error>
where
    S: Store,
{
    let query = Query {
        published_at_or_before: Some(now),
        ..default::default()
    };
    QuestionCommon::query(storer, &query, Some(Pagination::new(LATEST_QUESTIONS_LIMIT, None))).await
}

pub async fn question_with_choices<S>(storer: &mut S, id: i64) -> Result<QuestionWithChoices, Error>
where
    S: Store,
{
    let question = QuestionCommon::get(storer, id).await?.ok_or(Error::NotFound)?;
    let choices = ChoiceCommon::query(
        storer,
        &ChoiceQuery {
            question_id: Some(id),
            ..default::default()
        },
    )
    .await?;
    Ok(QuestionWithChoices { question, choices })
}

/// One page of matching questions plus the total match count. Pages past the end fall back to the last page,
/// which is returned alongside.
pub async fn questions<S>(storer: &mut S, query: &Query, page: i64, per_page: i64) -> Result<(Vec<Question>, i64, i64), Error>
where
    S: Store,
{
    let total = QuestionCommon::count(storer, query).await?;
    let page = page.clamp(1, Pagination::num_pages(total, per_page));
    let questions = QuestionCommon::query(storer, query, Some(Pagination::page(page, per_page))).await?;
    Ok((questions, total, page))
}
