use crate::core::models::{
    choice::{Change as ChoiceChange, Insert as ChoiceInsert, Query as ChoiceQuery, Update as ChoiceUpdate},
    question::{Edit, Insert as QuestionInsert, Update as QuestionUpdate},
};
use crate::core::ports::repository::{ChoiceCommon, QuestionCommon, TxStore};
use crate::error::Error;

async fn apply_choice_changes<T>(storer: &mut T, question_id: i64, changes: Vec<ChoiceChange>) -> Result<(), Error>
where
    T: TxStore,
{
    for change in changes {
        match change {
            ChoiceChange::Create { choice_text } => {
                ChoiceCommon::insert(storer, ChoiceInsert { question_id, choice_text }).await?;
            }
            ChoiceChange::Rename { id, choice_text } => {
                if !ChoiceCommon::update(storer, question_id, id, ChoiceUpdate { choice_text }).await? {
                    return Err(Error::NotFound);
                }
            }
            ChoiceChange::Delete { id } => {
                ChoiceCommon::delete(
                    storer,
                    &ChoiceQuery {
                        id: Some(id),
                        question_id: Some(question_id),
                    },
                )
                .await?;
            }
        }
    }
    Ok(())
}

pub async fn create_question<T>(mut storer: T, edit: Edit) -> Result<i64, Error>
where
    T: TxStore,
{
    let id = QuestionCommon::insert(
        &mut storer,
        QuestionInsert {
            question_text: edit.question_text,
            pub_date: edit.pub_date,
        },
    )
    .await?;
    apply_choice_changes(&mut storer, id, edit.choices).await?;
    storer.commit().await?;
    log::info!("created question {}", id);
    Ok(id)
}

pub async fn update_question<T>(mut storer: T, id: i64, edit: Edit) -> Result<(), Error>
where
    T: TxStore,
{
    let updated = QuestionCommon::update(
        &mut storer,
        id,
        QuestionUpdate {
            question_text: edit.question_text,
            pub_date: edit.pub_date,
        },
    )
    .await?;
    if !updated {
        storer.rollback().await?;
        return Err(Error::NotFound);
    }
    apply_choice_changes(&mut storer, id, edit.choices).await?;
    storer.commit().await?;
    log::info!("updated question {}", id);
    Ok(())
}

/// Deletes a question together with all of its choices in one transaction.
/// Returns how many choices went with it.
pub async fn delete_question<T>(mut storer: T, id: i64) -> Result<u64, Error>
where
    T: TxStore,
{
    let choices = ChoiceCommon::delete(
        &mut storer,
        &ChoiceQuery {
            question_id: Some(id),
            ..default::default()
        },
    )
    .await?;
    if !QuestionCommon::delete(&mut storer, id).await? {
        storer.rollback().await?;
        return Err(Error::NotFound);
    }
    storer.commit().await?;
    log::info!("deleted question {} and {} choice(s)", id, choices);
    Ok(choices)
}
