use std::ops::RangeInclusive;
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::auth::jwt::{JwtConfig, DEFAULT_EXPIRY_HOURS};

/// Configuration that could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Accepted `PASSWORD_RESET_TIMEOUT_MINS`: one minute to one week.
pub const PASSWORD_RESET_TIMEOUT_RANGE: RangeInclusive<i64> = 1..=7 * 24 * 60;

/// Accepted `JWT_EXPIRY_HOURS`: one hour to one year.
pub const JWT_EXPIRY_RANGE: RangeInclusive<i64> = 1..=365 * 24;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the JSON collection files (default: `./data/`).
    pub data_location: PathBuf,
    /// How long a password reset token stays valid (default: `15`).
    pub password_reset_timeout_mins: i64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `DATA_LOCATION`               | `./data/`               |
    /// | `JWT_SECRET`                  | **required**            |
    /// | `JWT_EXPIRY_HOURS`            | `12`                    |
    /// | `PASSWORD_RESET_TIMEOUT_MINS` | `15`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: bad.clone(),
            });
        }

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let data_location =
            PathBuf::from(lookup("DATA_LOCATION").unwrap_or_else(|| "./data/".into()));
        let password_reset_timeout_mins = parse_within(
            &lookup,
            "PASSWORD_RESET_TIMEOUT_MINS",
            15,
            PASSWORD_RESET_TIMEOUT_RANGE,
        )?;

        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let expiry_hours =
            parse_within(&lookup, "JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS, JWT_EXPIRY_RANGE)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_location,
            password_reset_timeout_mins,
            jwt: JwtConfig {
                secret,
                expiry_hours,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn parse_within<F>(
    lookup: &F,
    var: &'static str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, var, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.data_location, PathBuf::from("./data/"));
        assert_eq!(config.password_reset_timeout_mins, 15);
        assert_eq!(config.jwt.expiry_hours, 12);
    }

    #[test]
    fn jwt_secret_required() {
        assert_matches!(
            ServerConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
        assert_matches!(
            ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "")])),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn invalid_numbers_rejected() {
        assert_matches!(
            ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "x"), ("PORT", "http")])),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }

    #[test]
    fn durations_out_of_range_rejected() {
        for value in ["0", "-5", "9223372036854775807"] {
            assert_matches!(
                ServerConfig::from_lookup(lookup(&[
                    ("JWT_SECRET", "x"),
                    ("PASSWORD_RESET_TIMEOUT_MINS", value),
                ])),
                Err(ConfigError::Invalid { var: "PASSWORD_RESET_TIMEOUT_MINS", .. })
            );
        }
        assert_matches!(
            ServerConfig::from_lookup(lookup(&[
                ("JWT_SECRET", "x"),
                ("JWT_EXPIRY_HOURS", "9223372036854775807"),
            ])),
            Err(ConfigError::Invalid { var: "JWT_EXPIRY_HOURS", .. })
        );

        let config = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("PASSWORD_RESET_TIMEOUT_MINS", "10080"),
        ]))
        .unwrap();
        assert_eq!(config.password_reset_timeout_mins, 10080);
    }

    #[test]
    fn cors_origins_split_and_trimmed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,,"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
