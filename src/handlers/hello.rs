use crate::error::Error;
use crate::templates::Templates;
use actix_web::web::{Data, Query};
use actix_web::HttpResponse;
use serde::Deserialize;
use tera::Context;

#[derive(Debug, Deserialize)]
pub struct Greeting {
    name: Option<String>,
}

pub async fn hello(Query(Greeting { name }): Query<Greeting>, templates: Data<Templates>) -> Result<HttpResponse, Error> {
    let name = name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| "world".into());
    let mut context = Context::new();
    context.insert("name", &name);
    templates.render("hello.html", &context)
}
