use std::{env, net::SocketAddr, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_AUTH_REDIRECT: &str = "/auth";
const DEFAULT_SESSION_COOKIE: &str = "sb-access-token";
const DEFAULT_DAILY_GOAL: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub auth_redirect_url: String,
    pub session_cookie: String,
    pub default_daily_goal: u32,
    pub backend_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let supabase_url = non_empty("SUPABASE_URL")
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();
        let supabase_anon_key = non_empty("SUPABASE_ANON_KEY")
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?
            .trim()
            .to_string();

        let default_daily_goal = match non_empty("DEFAULT_DAILY_GOAL") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(goal) if goal > 0 => goal,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DEFAULT_DAILY_GOAL",
                        value,
                    });
                }
            },
            None => DEFAULT_DAILY_GOAL,
        };

        let backend_timeout = match non_empty("BACKEND_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "BACKEND_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            supabase_url,
            supabase_anon_key,
            auth_redirect_url: non_empty("AUTH_REDIRECT_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_REDIRECT.to_string()),
            session_cookie: non_empty("SESSION_COOKIE")
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            default_daily_goal,
            backend_timeout,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_backend_is_set() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://example.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.supabase_url, "https://example.supabase.co");
        assert_eq!(config.auth_redirect_url, "/auth");
        assert_eq!(config.session_cookie, "sb-access-token");
        assert_eq!(config.default_daily_goal, 50);
        assert_eq!(config.backend_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_backend_url_is_an_error() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));
    }

    #[test]
    fn zero_goal_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "http://localhost"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("DEFAULT_DAILY_GOAL", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DEFAULT_DAILY_GOAL", .. }));
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "http://localhost"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("PORT", "not-a-port"),
            ("AUTH_REDIRECT_URL", "https://example.com/login"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.auth_redirect_url, "https://example.com/login");
    }
}
