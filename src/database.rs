pub mod schema;
pub mod sqlx;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, Error> {
        match url.split_once(':').map(|(scheme, _)| scheme) {
            Some("postgres") | Some("postgresql") => Ok(Backend::Postgres),
            Some("sqlite") => Ok(Backend::Sqlite),
            _ => Err(Error::ConfigError(format!("unsupported database url: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_follows_url_scheme() {
        assert_eq!(Backend::from_url("postgres://django@localhost/polls").unwrap(), Backend::Postgres);
        assert_eq!(Backend::from_url("postgresql://localhost").unwrap(), Backend::Postgres);
        assert_eq!(Backend::from_url("sqlite://polls.db").unwrap(), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert!(Backend::from_url("mysql://localhost").is_err());
        assert!(Backend::from_url("polls.db").is_err());
    }
}
