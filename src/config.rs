use crate::session::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Absolute origin for explorer links, e.g. `https://aquatrack.example`.
    pub public_origin: Option<String>,
    pub session_idle: Duration,
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            public_origin: None,
            session_idle: DEFAULT_IDLE_TIMEOUT,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let public_origin = lookup("AQUATRACK_PUBLIC_ORIGIN")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty());
        let session_idle = lookup("AQUATRACK_SESSION_IDLE_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT);
        let max_sessions = lookup("AQUATRACK_MAX_SESSIONS")
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_SESSIONS);

        Self {
            port,
            public_origin,
            session_idle,
            max_sessions,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn explorer_url(&self, tx_hash: &str) -> String {
        match &self.public_origin {
            Some(origin) => format!("{origin}/explorer/{tx_hash}"),
            None => format!("/explorer/{tx_hash}"),
        }
    }
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.explorer_url("0x1f"), "/explorer/0x1f");
    }

    #[test]
    fn bad_port_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn session_limits_from_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("AQUATRACK_SESSION_IDLE_SECS", "90"),
            ("AQUATRACK_MAX_SESSIONS", "12"),
        ]));
        assert_eq!(config.session_idle, Duration::from_secs(90));
        assert_eq!(config.max_sessions, 12);

        let zeroed = AppConfig::from_lookup(lookup_from(&[
            ("AQUATRACK_SESSION_IDLE_SECS", "0"),
            ("AQUATRACK_MAX_SESSIONS", "0"),
        ]));
        assert_eq!(zeroed.session_idle, DEFAULT_IDLE_TIMEOUT);
        assert_eq!(zeroed.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn origin_builds_absolute_explorer_url() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "3000"),
            ("AQUATRACK_PUBLIC_ORIGIN", "https://aqua.example/"),
        ]));
        assert_eq!(config.listen_addr().port(), 3000);
        assert_eq!(
            config.explorer_url("0xdeadbeef"),
            "https://aqua.example/explorer/0xdeadbeef"
        );
    }
}
