use crate::core::models::vote::{Outcome, Selection};
use crate::core::ports::repository::{ChoiceCommon, QuestionCommon, Store};
use crate::core::services::question::question_with_choices;
use crate::error::Error;

/// Records one vote for the selected choice of `question_id`.
///
/// The count is bumped by a single relative update in the store, so concurrent voters
/// never overwrite each other. A selection that is missing, malformed, or names a choice
/// of another question leaves every count untouched.
pub async fn vote<S>(storer: &mut S, question_id: i64, selection: Selection) -> Result<Outcome, Error>
where
    S: Store,
{
    if QuestionCommon::get(storer, question_id).await?.is_none() {
        return Err(Error::NotFound);
    }
    if let Selection::Choice(choice_id) = selection {
        if ChoiceCommon::increment_votes(storer, question_id, choice_id).await? {
            log::debug!("recorded vote for choice {} of question {}", choice_id, question_id);
            return Ok(Outcome::Recorded);
        }
    }
    log::debug!("rejected vote on question {}: {:?}", question_id, selection);
    let question = question_with_choices(storer, question_id).await?;
    Ok(Outcome::Rejected(question))
}
