use std::{path::PathBuf, str::FromStr};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Who may call `POST /api/users`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationPolicy {
    /// Anyone can register (the historical behavior).
    #[default]
    Open,
    /// Registration needs a valid access token.
    Authenticated,
}

impl FromStr for RegistrationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "authenticated" | "auth" => Ok(Self::Authenticated),
            other => anyhow::bail!("unknown REGISTRATION_POLICY: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
    pub registration: RegistrationPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests can avoid touching the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{key} must be set"))
        };
        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: positive(&lookup, "DB_MAX_CONNECTIONS", 10u32)?,
            acquire_timeout_secs: positive(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5u64)?,
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "accounts".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "accounts-users".into()),
            ttl_minutes: positive(&lookup, "JWT_TTL_MINUTES", 60i64)?,
            refresh_ttl_minutes: positive(&lookup, "JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14i64)?,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let registration = match lookup("REGISTRATION_POLICY") {
            Some(v) => v.parse()?,
            None => RegistrationPolicy::default(),
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match lookup("APP_PORT") {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid APP_PORT {v:?}: {e}"))?,
                None => 5001,
            },
            database,
            jwt,
            cors_origins,
            static_dir: lookup("STATIC_DIR").map(PathBuf::from),
            registration,
        })
    }
}

/// Reads a numeric key, falling back to `default` when unset. Zero, negative or
/// unparsable values are rejected instead of being coerced.
fn positive<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid {key} {raw:?}: {e}"))?;
    if value <= T::default() {
        anyhow::bail!("{key} must be greater than zero, got {raw:?}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .expect("config");

        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.jwt.issuer, "accounts");
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert!(cfg.cors_origins.is_empty());
        assert!(cfg.static_dir.is_none());
        assert_eq!(cfg.registration, RegistrationPolicy::Open);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "memory://")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn numeric_settings_reject_negative_zero_and_garbage() {
        for (key, value) in [
            ("DB_MAX_CONNECTIONS", "-1"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "soon"),
            ("JWT_TTL_MINUTES", "-5"),
            ("APP_PORT", "70000"),
        ] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "memory://"),
                ("JWT_SECRET", "s3cret"),
                (key, value),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains(key), "{key}={value}: {err}");
        }
    }

    #[test]
    fn numeric_settings_parse_valid_values() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "s3cret"),
            ("DB_MAX_CONNECTIONS", " 25 "),
            ("APP_PORT", "8080"),
        ]))
        .expect("config");
        assert_eq!(cfg.database.max_connections, 25);
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGINS", "http://127.0.0.1:5500, http://localhost:3000,,"),
        ]))
        .expect("config");

        assert_eq!(
            cfg.cors_origins,
            vec!["http://127.0.0.1:5500", "http://localhost:3000"]
        );
    }

    #[test]
    fn registration_policy_parses_known_values() {
        assert_eq!("open".parse::<RegistrationPolicy>().unwrap(), RegistrationPolicy::Open);
        assert_eq!(
            " Authenticated ".parse::<RegistrationPolicy>().unwrap(),
            RegistrationPolicy::Authenticated
        );
        assert!("admins-only".parse::<RegistrationPolicy>().is_err());
    }
}
