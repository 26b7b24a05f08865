use crate::error::Error;
use chrono_tz::Tz;

pub static DEBUG: &str = "DEBUG";
pub static DATABASE_URL: &str = "DATABASE_URL";
pub static DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub static HOST: &str = "HOST";
pub static PORT: &str = "PORT";
pub static ALLOWED_HOSTS: &str = "ALLOWED_HOSTS";
pub static LANGUAGE_CODE: &str = "LANGUAGE_CODE";
pub static TIME_ZONE: &str = "TIME_ZONE";
pub static TEMPLATE_DIR: &str = "TEMPLATE_DIR";
pub static ADMIN_ENABLED: &str = "ADMIN_ENABLED";

/// Process-wide configuration, read once at startup and handed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub debug: bool,
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub allowed_hosts: Vec<String>,
    pub language_code: String,
    pub time_zone: Tz,
    pub template_dir: Option<String>,
    pub admin_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            database_url: "sqlite::memory:".into(),
            max_connections: 5,
            host: "0.0.0.0".into(),
            port: 8000,
            allowed_hosts: Vec::new(),
            language_code: "en-us".into(),
            time_zone: Tz::UTC,
            template_dir: None,
            admin_enabled: false,
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        ignore_missing(dotenv::dotenv())?;
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let debug = match lookup(DEBUG) {
            Some(v) => parse_bool(DEBUG, &v)?,
            None => defaults.debug,
        };
        let database_url = lookup(DATABASE_URL).filter(|v| !v.trim().is_empty()).ok_or_else(|| Error::ConfigError(format!("{} must be set", DATABASE_URL)))?;
        let max_connections = match lookup(DATABASE_MAX_CONNECTIONS) {
            Some(v) => v.trim().parse::<u32>().map_err(|e| Error::ConfigError(format!("{}: {}", DATABASE_MAX_CONNECTIONS, e)))?,
            None => defaults.max_connections,
        };
        let port = match lookup(PORT) {
            Some(v) => v.trim().parse::<u16>().map_err(|e| Error::ConfigError(format!("{}: {}", PORT, e)))?,
            None => defaults.port,
        };
        let time_zone = match lookup(TIME_ZONE) {
            Some(v) => v.trim().parse::<Tz>().map_err(|e| Error::ConfigError(format!("{}: {}", TIME_ZONE, e)))?,
            None => defaults.time_zone,
        };
        let admin_enabled = match lookup(ADMIN_ENABLED) {
            Some(v) => parse_bool(ADMIN_ENABLED, &v)?,
            None => debug,
        };
        Ok(Self {
            debug,
            database_url,
            max_connections,
            host: lookup(HOST).unwrap_or(defaults.host),
            port,
            allowed_hosts: lookup(ALLOWED_HOSTS).map(|v| split_list(&v)).unwrap_or_default(),
            language_code: lookup(LANGUAGE_CODE).unwrap_or(defaults.language_code),
            time_zone,
            template_dir: lookup(TEMPLATE_DIR).filter(|v| !v.trim().is_empty()),
            admin_enabled,
        })
    }

    /// Host patterns actually enforced. Development mode with nothing configured
    /// still answers on the loopback names.
    pub fn effective_allowed_hosts(&self) -> Vec<String> {
        if self.allowed_hosts.is_empty() && self.debug {
            return vec![".localhost".into(), "127.0.0.1".into(), "[::1]".into()];
        }
        self.allowed_hosts.clone()
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// A missing `.env` is fine, one that cannot be read or parsed is not.
fn ignore_missing<T>(loaded: Result<T, dotenv::Error>) -> Result<(), Error> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::ConfigError(format!("{}: invalid boolean {:?}", key, other))),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned).collect()
}
