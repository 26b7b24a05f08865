use crate::core::models::{
    question::QuestionWithChoices,
    vote::{Outcome, Selection},
};
use crate::core::ports::repository::Manager;
use crate::core::services::{question as question_service, vote as vote_service};
use crate::error::Error;
use crate::request::VoteForm;
use crate::response::{redirect, ChoiceItem, QuestionItem};
use crate::templates::Templates;
use actix_web::web::{Bytes, Data, Path};
use actix_web::HttpResponse;
use chrono::Utc;
use tera::Context;

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

fn question_context(question: &QuestionWithChoices, templates: &Templates) -> Context {
    let mut context = Context::new();
    context.insert("question", &QuestionItem::new(&question.question, templates, Utc::now()));
    context.insert("choices", &question.choices.iter().map(ChoiceItem::from).collect::<Vec<_>>());
    context.insert("total_votes", &question.total_votes());
    context
}

pub async fn index<M: Manager + 'static>(manager: Data<M>, templates: Data<Templates>) -> Result<HttpResponse, Error> {
    let mut storer = manager.db().await?;
    let now = Utc::now();
    let questions = question_service::latest_questions(&mut storer, now).await?;
    let mut context = Context::new();
    context.insert(
        "latest_question_list",
        &questions.iter().map(|q| QuestionItem::new(q, &templates, now)).collect::<Vec<_>>(),
    );
    templates.render("polls/index.html", &context)
}

pub async fn detail<M: Manager + 'static>(
    path: Path<(i64,)>,
    manager: Data<M>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let mut storer = manager.db().await?;
    let question = question_service::question_with_choices(&mut storer, question_id).await?;
    templates.render("polls/detail.html", &question_context(&question, &templates))
}

pub async fn results<M: Manager + 'static>(
    path: Path<(i64,)>,
    manager: Data<M>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let mut storer = manager.db().await?;
    let question = question_service::question_with_choices(&mut storer, question_id).await?;
    templates.render("polls/results.html", &question_context(&question, &templates))
}

/// Reads the body itself so that an empty or non-form body counts as "no choice" instead of a 400.
pub async fn vote<M: Manager + 'static>(
    path: Path<(i64,)>,
    body: Bytes,
    manager: Data<M>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let selection = Selection::from(VoteForm::from_body(&body));
    let mut storer = manager.db().await?;
    match vote_service::vote(&mut storer, question_id, selection).await? {
        Outcome::Recorded => Ok(redirect(&format!("/polls/{}/results/", question_id))),
        Outcome::Rejected(question) => {
            let mut context = question_context(&question, &templates);
            context.insert("error_message", NO_CHOICE_SELECTED);
            templates.render("polls/detail.html", &context)
        }
    }
}
