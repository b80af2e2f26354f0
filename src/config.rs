use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::errors::{Error, Result};

pub const PROVIDER_URL: &str = "PROVIDER_URL";
pub const PROVIDER_ANON_KEY: &str = "PROVIDER_ANON_KEY";
pub const PROVIDER_SERVICE_ROLE_KEY: &str = "PROVIDER_SERVICE_ROLE_KEY";
pub const ADMIN_TOKEN_SECRET: &str = "ADMIN_TOKEN_SECRET";
pub const CRON_SECRET: &str = "CRON_SECRET";

/// Checked at boot, in this order.
pub const REQUIRED_VARS: [&str; 5] = [
    PROVIDER_URL,
    PROVIDER_ANON_KEY,
    PROVIDER_SERVICE_ROLE_KEY,
    ADMIN_TOKEN_SECRET,
    CRON_SECRET,
];

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: String,
    pub provider_url: String,
    pub provider_namespace: String,
    pub provider_database: String,
    pub provider_user: String,
    pub anon_key: String,
    pub service_role_key: String,
    pub admin_token_secret: String,
    pub cron_secret: String,
    pub session_jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Every missing required
    /// variable is collected before failing so the operator sees them all.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<String> = REQUIRED_VARS
            .into_iter()
            .filter(|key| value(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingEnv(missing));
        }
        let required = |key: &str| value(key).ok_or_else(|| Error::MissingEnv(vec![key.into()]));

        let service_role_key = required(PROVIDER_SERVICE_ROLE_KEY)?;
        let session_jwt_secret = value("SESSION_JWT_SECRET").unwrap_or_else(|| {
            info!("SESSION_JWT_SECRET not set, verifying sessions with the service-role key");
            service_role_key.clone()
        });

        Ok(Self {
            port: try_load(&value, "PORT", "3587")?,
            bind_addr: try_load(&value, "BIND_ADDR", "127.0.0.1")?,
            provider_url: required(PROVIDER_URL)?,
            provider_namespace: try_load(&value, "PROVIDER_NAMESPACE", "recruiting")?,
            provider_database: try_load(&value, "PROVIDER_DATABASE", "app")?,
            provider_user: try_load(&value, "PROVIDER_USER", "root")?,
            anon_key: required(PROVIDER_ANON_KEY)?,
            service_role_key,
            admin_token_secret: required(ADMIN_TOKEN_SECRET)?,
            cron_secret: required(CRON_SECRET)?,
            session_jwt_secret,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn try_load<T, F>(value: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    value(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| Error::InvalidEnv(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (PROVIDER_URL, "ws://localhost:8050"),
            (PROVIDER_ANON_KEY, "anon"),
            (PROVIDER_SERVICE_ROLE_KEY, "service"),
            (ADMIN_TOKEN_SECRET, "admin-secret"),
            (CRON_SECRET, "cron-secret"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn loads_required_and_defaults() {
        let config = load(&full_env()).expect("config");
        assert_eq!(config.port, 3587);
        assert_eq!(config.provider_url, "ws://localhost:8050");
        assert_eq!(config.session_jwt_secret, "service");
        assert_eq!(config.address(), "127.0.0.1:3587");
    }

    #[test]
    fn reports_exactly_the_missing_names() {
        let mut env = full_env();
        env.remove(PROVIDER_ANON_KEY);
        env.insert(CRON_SECRET, "   ");

        match load(&env) {
            Err(Error::MissingEnv(names)) => {
                assert_eq!(names, vec![PROVIDER_ANON_KEY.to_string(), CRON_SECRET.to_string()])
            }
            other => panic!("expected MissingEnv, got {other:?}"),
        }
    }

    #[test]
    fn empty_environment_lists_every_required_var() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PROVIDER_URL, PROVIDER_ANON_KEY, \
             PROVIDER_SERVICE_ROLE_KEY, ADMIN_TOKEN_SECRET, CRON_SECRET"
        );
    }

    #[test]
    fn rejects_unparsable_port() {
        let mut env = full_env();
        env.insert("PORT", "eighty");
        assert!(matches!(load(&env), Err(Error::InvalidEnv(key, _)) if key == "PORT"));
    }
}
