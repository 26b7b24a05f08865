use crate::admin::{AdminSite, DateFilter, ModelAdmin};
use crate::core::models::question::Query as QuestionQuery;
use crate::core::ports::repository::Manager;
use crate::core::services::{admin as admin_service, question as question_service};
use crate::error::Error;
use crate::request::{ChangeListParams, QuestionForm, SubmitAction};
use crate::response::{redirect, ChoiceItem, FilterLink, List, QuestionItem, Row};
use crate::templates::Templates;
use actix_web::web::{Bytes, Data, Path, Query};
use actix_web::HttpResponse;
use chrono::Utc;
use tera::Context;

fn question_admin(site: &AdminSite) -> Result<&ModelAdmin, Error> {
    site.question().ok_or(Error::NotFound)
}

fn base_context(site: &AdminSite, admin: Option<&ModelAdmin>) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    if let Some(admin) = admin {
        context.insert("admin", admin);
    }
    context
}

// Builds `?q=..&pub_date=..&p=..`, leaving out empty parts.
fn changelist_href(search: Option<&str>, filter: DateFilter, page: i64) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    if let Some(q) = search {
        pairs.push(("q", q.to_owned()));
    }
    if filter != DateFilter::Any {
        pairs.push(("pub_date", filter.param().to_owned()));
    }
    if page > 1 {
        pairs.push(("p", page.to_string()));
    }
    match serde_urlencoded::to_string(&pairs) {
        Ok(qs) if !qs.is_empty() => format!("?{}", qs),
        _ => "?".into(),
    }
}

fn after_save(admin: &ModelAdmin, id: i64, action: SubmitAction) -> String {
    match action {
        SubmitAction::Save => admin.changelist_url(),
        SubmitAction::Continue => admin.change_url(id),
        SubmitAction::AddAnother => admin.add_url(),
    }
}

fn render_change_form(
    templates: &Templates,
    site: &AdminSite,
    admin: &ModelAdmin,
    form: &QuestionForm,
    object_id: Option<i64>,
) -> Result<HttpResponse, Error> {
    let mut context = base_context(site, Some(admin));
    let (title, action) = match object_id {
        Some(id) => {
            context.insert("delete_url", &admin.delete_url(id));
            (format!("Change {}", admin.verbose_name), admin.change_url(id))
        }
        None => (format!("Add {}", admin.verbose_name), admin.add_url()),
    };
    context.insert("title", &title);
    context.insert("action", &action);
    context.insert("form", form);
    context.insert("initial_forms", &form.choices.iter().filter(|c| c.id.is_some()).count());
    templates.render("admin/change_form.html", &context)
}

fn parse_submission(body: &[u8]) -> (QuestionForm, SubmitAction) {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();
    QuestionForm::from_pairs(pairs)
}

pub async fn index(site: Data<AdminSite>, templates: Data<Templates>) -> Result<HttpResponse, Error> {
    templates.render("admin/index.html", &base_context(&site, None))
}

pub async fn changelist<M: Manager + 'static>(
    Query(params): Query<ChangeListParams>,
    manager: Data<M>,
    site: Data<AdminSite>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let admin = question_admin(&site)?;
    let now = Utc::now();
    let search = if admin.search_fields.is_empty() { None } else { params.search() };
    let filter = if admin.list_filter.contains(&"pub_date") {
        DateFilter::from_param(params.pub_date.as_deref())
    } else {
        DateFilter::Any
    };
    let query = QuestionQuery {
        text_contains: search.clone(),
        published_between: filter.bounds(now, templates.time_zone()),
        ordering: admin.ordering,
        ..default::default()
    };
    let mut storer = manager.db().await?;
    let (questions, total, page) = question_service::questions(&mut storer, &query, params.page(), admin.list_per_page).await?;
    let rows: Vec<Row> = questions.iter().map(|q| Row::new(admin, q, &templates, now)).collect();
    let list = List::new(rows, total, page, admin.list_per_page).with_links(|n| changelist_href(search.as_deref(), filter, n));

    let filters: Vec<FilterLink> = if admin.list_filter.is_empty() {
        Vec::new()
    } else {
        DateFilter::ALL
            .into_iter()
            .map(|f| FilterLink {
                label: f.label(),
                href: changelist_href(search.as_deref(), f, 1),
                selected: f == filter,
            })
            .collect()
    };

    let mut context = base_context(&site, Some(admin));
    context.insert("add_url", &admin.add_url());
    context.insert("search", &search.unwrap_or_default());
    context.insert("filter_param", filter.param());
    context.insert("filters", &filters);
    context.insert("rows", &list.list);
    context.insert("page", &list);
    templates.render("admin/change_list.html", &context)
}

pub async fn add_form(site: Data<AdminSite>, templates: Data<Templates>) -> Result<HttpResponse, Error> {
    let admin = question_admin(&site)?;
    render_change_form(&templates, &site, admin, &QuestionForm::blank(admin.inline_extra()), None)
}

pub async fn add<M: Manager + 'static>(
    body: Bytes,
    manager: Data<M>,
    site: Data<AdminSite>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let admin = question_admin(&site)?;
    let (mut form, action) = parse_submission(&body);
    match form.validate(templates.time_zone()) {
        Some(edit) => {
            let id = admin_service::create_question(manager.tx().await?, edit).await?;
            Ok(redirect(&after_save(admin, id, action)))
        }
        None => render_change_form(&templates, &site, admin, &form, None),
    }
}

pub async fn change_form<M: Manager + 'static>(
    path: Path<(i64,)>,
    manager: Data<M>,
    site: Data<AdminSite>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let admin = question_admin(&site)?;
    let mut storer = manager.db().await?;
    let question = question_service::question_with_choices(&mut storer, question_id).await?;
    let form = QuestionForm::from_question(&question, templates.time_zone(), admin.inline_extra());
    render_change_form(&templates, &site, admin, &form, Some(question_id))
}

pub async fn change<M: Manager + 'static>(
    path: Path<(i64,)>,
    body: Bytes,
    manager: Data<M>,
    site: Data<AdminSite>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let admin = question_admin(&site)?;
    // released before the transaction below takes its own connection
    let current = {
        let mut storer = manager.db().await?;
        question_service::question_with_choices(&mut storer, question_id).await?
    };
    let (mut form, action) = parse_submission(&body);
    match form.validate(templates.time_zone()) {
        Some(edit) => {
            admin_service::update_question(manager.tx().await?, question_id, edit).await?;
            Ok(redirect(&after_save(admin, question_id, action)))
        }
        None => {
            form.fill_votes(&current.choices);
            render_change_form(&templates, &site, admin, &form, Some(question_id))
        }
    }
}

pub async fn delete_confirmation<M: Manager + 'static>(
    path: Path<(i64,)>,
    manager: Data<M>,
    site: Data<AdminSite>,
    templates: Data<Templates>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let admin = question_admin(&site)?;
    let mut storer = manager.db().await?;
    let question = question_service::question_with_choices(&mut storer, question_id).await?;
    let mut context = base_context(&site, Some(admin));
    context.insert("question", &QuestionItem::new(&question.question, &templates, Utc::now()));
    context.insert("choices", &question.choices.iter().map(ChoiceItem::from).collect::<Vec<_>>());
    context.insert("change_url", &admin.change_url(question_id));
    context.insert("delete_url", &admin.delete_url(question_id));
    templates.render("admin/delete_confirmation.html", &context)
}

pub async fn delete<M: Manager + 'static>(
    path: Path<(i64,)>,
    manager: Data<M>,
    site: Data<AdminSite>,
) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let admin = question_admin(&site)?;
    admin_service::delete_question(manager.tx().await?, question_id).await?;
    Ok(redirect(&admin.changelist_url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changelist_links_keep_search_and_filter() {
        assert_eq!(changelist_href(None, DateFilter::Any, 1), "?");
        assert_eq!(changelist_href(Some("what up"), DateFilter::Any, 2), "?q=what+up&p=2");
        assert_eq!(changelist_href(None, DateFilter::Today, 1), "?pub_date=today");
    }

    #[test]
    fn submit_buttons_choose_redirect() {
        let site = AdminSite::default();
        let admin = site.question().unwrap();
        assert_eq!(after_save(admin, 4, SubmitAction::Save), "/admin/polls/question/");
        assert_eq!(after_save(admin, 4, SubmitAction::Continue), "/admin/polls/question/4/change/");
        assert_eq!(after_save(admin, 4, SubmitAction::AddAnother), "/admin/polls/question/add/");
    }
}
