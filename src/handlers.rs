pub mod admin;
pub mod hello;
pub mod polls;

use crate::error::Error;
use actix_web::HttpResponse;

/// Fallback for every path no route claims.
pub async fn not_found() -> Result<HttpResponse, Error> {
    Err(Error::NotFound)
}
