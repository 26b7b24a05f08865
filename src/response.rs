use crate::admin::{column_value, ModelAdmin};
use crate::core::models::{choice::Choice, common::Pagination, question::Question};
use crate::templates::Templates;
use actix_web::http::header;
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 302 to `location`, sent after every successful POST.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found().insert_header((header::LOCATION, location)).finish()
}

#[derive(Debug, Serialize)]
pub struct QuestionItem {
    pub id: i64,
    pub question_text: String,
    pub pub_date: String,
    pub was_published_recently: bool,
}

impl QuestionItem {
    pub fn new(question: &Question, templates: &Templates, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text.clone(),
            pub_date: templates.format_datetime(&question.pub_date),
            was_published_recently: question.was_published_recently_at(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChoiceItem {
    pub id: i64,
    pub choice_text: String,
    pub votes: i32,
}

impl From<&Choice> for ChoiceItem {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text.clone(),
            votes: choice.votes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Cell {
    pub value: String,
    pub boolean: bool,
}

#[derive(Debug, Serialize)]
pub struct Row {
    pub change_url: String,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(admin: &ModelAdmin, question: &Question, templates: &Templates, now: DateTime<Utc>) -> Self {
        Self {
            change_url: admin.change_url(question.id),
            cells: admin
                .list_display
                .iter()
                .map(|column| Cell {
                    value: column_value(question, column.field, templates.time_zone(), now),
                    boolean: column.boolean,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterLink {
    pub label: &'static str,
    pub href: String,
    pub selected: bool,
}

/// One page of a change list. `previous`/`next` are ready-made links, absent at the ends.
#[derive(Debug, Serialize)]
pub struct List<T> {
    pub list: Vec<T>,
    pub total: i64,
    pub number: i64,
    pub num_pages: i64,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>, total: i64, number: i64, per_page: i64) -> Self {
        let num_pages = Pagination::num_pages(total, per_page);
        Self {
            list,
            total,
            number,
            num_pages,
            previous: None,
            next: None,
        }
    }

    /// Fills in page links, `link(n)` builds the href for page `n`.
    pub fn with_links<F>(mut self, link: F) -> Self
    where
        F: Fn(i64) -> String,
    {
        if self.number > 1 {
            self.previous = Some(link(self.number - 1));
        }
        if self.number < self.num_pages {
            self.next = Some(link(self.number + 1));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location() {
        let res = redirect("/polls/1/results/");
        assert_eq!(res.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/polls/1/results/");
    }

    #[test]
    fn list_pages_and_links() {
        let list = List::new(vec![1, 2], 250, 2, 100).with_links(|n| format!("?p={}", n));
        assert_eq!(list.num_pages, 3);
        assert_eq!(list.previous.as_deref(), Some("?p=1"));
        assert_eq!(list.next.as_deref(), Some("?p=3"));

        let empty = List::<i32>::new(vec![], 0, 1, 100).with_links(|n| format!("?p={}", n));
        assert_eq!(empty.num_pages, 1);
        assert!(empty.previous.is_none() && empty.next.is_none());
    }
}
