//! Declarative admin configuration. An [`AdminSite`] is built once at startup and handed to
//! the admin handlers, which read everything they display from it.

use crate::core::models::question::{Ordering, Question};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Fieldset {
    pub name: Option<&'static str>,
    pub fields: Vec<&'static str>,
    pub classes: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabularInline {
    pub verbose_name_plural: &'static str,
    pub fields: Vec<&'static str>,
    pub readonly_fields: Vec<&'static str>,
    pub extra: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListColumn {
    pub field: &'static str,
    pub label: &'static str,
    pub boolean: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateFilter {
    Any,
    Today,
    PastSevenDays,
    ThisMonth,
    ThisYear,
}

impl DateFilter {
    pub const ALL: [DateFilter; 5] = [DateFilter::Any, DateFilter::Today, DateFilter::PastSevenDays, DateFilter::ThisMonth, DateFilter::ThisYear];

    pub fn from_param(param: Option<&str>) -> Self {
        Self::ALL.into_iter().find(|f| Some(f.param()) == param).unwrap_or(DateFilter::Any)
    }

    pub fn param(&self) -> &'static str {
        match self {
            DateFilter::Any => "",
            DateFilter::Today => "today",
            DateFilter::PastSevenDays => "past_7_days",
            DateFilter::ThisMonth => "this_month",
            DateFilter::ThisYear => "this_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFilter::Any => "Any date",
            DateFilter::Today => "Today",
            DateFilter::PastSevenDays => "Past 7 days",
            DateFilter::ThisMonth => "This month",
            DateFilter::ThisYear => "This year",
        }
    }

    /// Half-open UTC window for the filter, computed from calendar days in `tz`.
    pub fn bounds(&self, now: DateTime<Utc>, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.with_timezone(tz).date_naive();
        let tomorrow = today + Duration::days(1);
        let (from, to) = match self {
            DateFilter::Any => return None,
            DateFilter::Today => (today, tomorrow),
            DateFilter::PastSevenDays => (today - Duration::days(7), tomorrow),
            DateFilter::ThisMonth => {
                let first = today.with_day(1)?;
                let next = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
                };
                (first, next)
            }
            DateFilter::ThisYear => (NaiveDate::from_ymd_opt(today.year(), 1, 1)?, NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?),
        };
        Some((local_midnight(from, tz), local_midnight(to, tz)))
    }
}

// Some zones skip midnight on DST changes; fall back to reading the wall clock as UTC there.
fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelAdmin {
    pub app_label: &'static str,
    pub model_name: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub fieldsets: Vec<Fieldset>,
    pub inlines: Vec<TabularInline>,
    pub list_display: Vec<ListColumn>,
    pub list_filter: Vec<&'static str>,
    pub search_fields: Vec<&'static str>,
    #[serde(skip)]
    pub ordering: Ordering,
    pub list_per_page: i64,
}

impl ModelAdmin {
    pub fn changelist_url(&self) -> String {
        format!("/admin/{}/{}/", self.app_label, self.model_name)
    }

    pub fn add_url(&self) -> String {
        format!("{}add/", self.changelist_url())
    }

    pub fn change_url(&self, id: i64) -> String {
        format!("{}{}/change/", self.changelist_url(), id)
    }

    pub fn delete_url(&self, id: i64) -> String {
        format!("{}{}/delete/", self.changelist_url(), id)
    }

    /// Rows this admin adds beneath existing inline rows.
    pub fn inline_extra(&self) -> usize {
        self.inlines.first().map(|i| i.extra).unwrap_or(0)
    }
}

/// Question admin: text first, the date in a collapsible section, choices edited inline.
pub fn question_admin() -> ModelAdmin {
    ModelAdmin {
        app_label: "polls",
        model_name: "question",
        verbose_name: "question",
        verbose_name_plural: "questions",
        fieldsets: vec![
            Fieldset {
                name: None,
                fields: vec!["question_text"],
                classes: vec![],
            },
            Fieldset {
                name: Some("Date information"),
                fields: vec!["pub_date"],
                classes: vec!["collapse"],
            },
        ],
        inlines: vec![TabularInline {
            verbose_name_plural: "choices",
            fields: vec!["choice_text", "votes"],
            readonly_fields: vec!["votes"],
            extra: 3,
        }],
        list_display: vec![
            ListColumn {
                field: "question_text",
                label: "Question text",
                boolean: false,
            },
            ListColumn {
                field: "pub_date",
                label: "Date published",
                boolean: false,
            },
            ListColumn {
                field: "was_published_recently",
                label: "Published recently?",
                boolean: true,
            },
        ],
        list_filter: vec!["pub_date"],
        search_fields: vec!["question_text"],
        ordering: Ordering::PubDateDesc,
        list_per_page: 100,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSite {
    pub site_header: String,
    pub models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn new(site_header: &str) -> Self {
        Self {
            site_header: site_header.to_owned(),
            models: Vec::new(),
        }
    }

    pub fn register(mut self, admin: ModelAdmin) -> Self {
        self.models.retain(|m| !(m.app_label == admin.app_label && m.model_name == admin.model_name));
        self.models.push(admin);
        self
    }

    pub fn get(&self, app_label: &str, model_name: &str) -> Option<&ModelAdmin> {
        self.models.iter().find(|m| m.app_label == app_label && m.model_name == model_name)
    }

    pub fn question(&self) -> Option<&ModelAdmin> {
        self.get("polls", "question")
    }
}

impl Default for AdminSite {
    fn default() -> Self {
        AdminSite::new("Polls administration").register(question_admin())
    }
}

/// Cell text for one `list_display` column.
pub fn column_value(question: &Question, field: &str, tz: &Tz, now: DateTime<Utc>) -> String {
    match field {
        "question_text" => question.question_text.clone(),
        "pub_date" => question.pub_date.with_timezone(tz).format("%b %-d, %Y, %H:%M").to_string(),
        "was_published_recently" => (if question.was_published_recently_at(now) { "True" } else { "False" }).to_owned(),
        "id" => question.id.to_string(),
        _ => String::new(),
    }
}
