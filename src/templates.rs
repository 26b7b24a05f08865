use crate::error::Error;
use crate::settings::Settings;
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, HttpResponseBuilder};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tera::{Context, Tera};

const BUILTIN: [(&str, &str); 10] = [
    ("base.html", include_str!("../templates/base.html")),
    ("hello.html", include_str!("../templates/hello.html")),
    ("polls/index.html", include_str!("../templates/polls/index.html")),
    ("polls/detail.html", include_str!("../templates/polls/detail.html")),
    ("polls/results.html", include_str!("../templates/polls/results.html")),
    ("admin/base.html", include_str!("../templates/admin/base.html")),
    ("admin/index.html", include_str!("../templates/admin/index.html")),
    ("admin/change_list.html", include_str!("../templates/admin/change_list.html")),
    ("admin/change_form.html", include_str!("../templates/admin/change_form.html")),
    ("admin/delete_confirmation.html", include_str!("../templates/admin/delete_confirmation.html")),
];

/// Template engine plus the locale settings every page is rendered with.
pub struct Templates {
    tera: Tera,
    time_zone: Tz,
    language_code: String,
}

impl Templates {
    /// Built-in templates, overridden by any `*.html` found under `template_dir`.
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let mut tera = match &settings.template_dir {
            Some(dir) => Tera::parse(&format!("{}/**/*.html", dir.trim_end_matches('/')))?,
            None => Tera::default(),
        };
        let mut builtin = Tera::default();
        builtin.add_raw_templates(BUILTIN)?;
        tera.extend(&builtin)?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self {
            tera,
            time_zone: settings.time_zone,
            language_code: settings.language_code.clone(),
        })
    }

    pub fn time_zone(&self) -> &Tz {
        &self.time_zone
    }

    pub fn format_datetime(&self, dt: &DateTime<Utc>) -> String {
        dt.with_timezone(&self.time_zone).format("%B %-d, %Y, %H:%M").to_string()
    }

    pub fn render_string(&self, name: &str, context: &Context) -> Result<String, Error> {
        let mut context = context.clone();
        context.insert("LANGUAGE_CODE", &self.language_code);
        context.insert("TIME_ZONE", self.time_zone.name());
        Ok(self.tera.render(name, &context)?)
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<HttpResponse, Error> {
        self.render_with_status(StatusCode::OK, name, context)
    }

    pub fn render_with_status(&self, status: StatusCode, name: &str, context: &Context) -> Result<HttpResponse, Error> {
        let body = self.render_string(name, context)?;
        Ok(HttpResponseBuilder::new(status)
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .body(body))
    }
}
