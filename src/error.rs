use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("dotenv error: {0}")]
    DotEnvError(#[from] dotenv::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("not found")]
    NotFound,

    #[error("invalid HTTP_HOST header: {0}")]
    DisallowedHost(String),
}

const NOT_FOUND_PAGE: &str = "<!doctype html>\n<html lang=\"en\">\n<head><title>Not Found</title></head>\n<body>\n  <h1>Not Found</h1><p>The requested resource was not found on this server.</p>\n</body>\n</html>\n";
const BAD_REQUEST_PAGE: &str = "<!doctype html>\n<html lang=\"en\">\n<head><title>Bad Request (400)</title></head>\n<body>\n  <h1>Bad Request (400)</h1>\n</body>\n</html>\n";
const SERVER_ERROR_PAGE: &str = "<!doctype html>\n<html lang=\"en\">\n<head><title>Server Error (500)</title></head>\n<body>\n  <h1>Server Error (500)</h1>\n</body>\n</html>\n";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DisallowedHost(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match status {
            StatusCode::NOT_FOUND => NOT_FOUND_PAGE,
            StatusCode::BAD_REQUEST => BAD_REQUEST_PAGE,
            _ => {
                log::error!("{}", self);
                SERVER_ERROR_PAGE
            }
        };
        HttpResponseBuilder::new(status)
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::NotFound.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_map_to_500() {
        let err = Error::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::ConfigError("bad".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn disallowed_host_maps_to_400() {
        assert_eq!(Error::DisallowedHost("evil.test".into()).status_code(), StatusCode::BAD_REQUEST);
    }
}
