//! Typed agent settings extracted from the global properties

use crate::context::Context;
use crate::errors::{ConfigError, ConfigResult};
use crate::properties::Properties;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8086;
pub const DEFAULT_INTERVAL_SECS: i64 = 30;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PASSWORD: &str = "root";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// An InfluxDB endpoint
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`
    pub fn parse(text: &str, default_port: u16) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty server entry".into());
        }

        let (host, port) = if let Some(rest) = text.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| format!("unclosed '[' in '{}'", text))?;
            let port = match after {
                "" => None,
                _ => Some(
                    after
                        .strip_prefix(':')
                        .ok_or_else(|| format!("unexpected text after ']' in '{}'", text))?,
                ),
            };
            (host, port)
        } else {
            match text.split_once(':') {
                // More than one ':' without brackets is a bare IPv6 address
                Some((_, port)) if port.contains(':') => (text, None),
                Some((host, port)) => (host, Some(port)),
                None => (text, None),
            }
        };

        if host.is_empty() {
            return Err(format!("missing host in '{}'", text));
        }

        let port = match port {
            None => default_port,
            // Digits only: `u16::from_str` would also take a leading '+'
            Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
                match p.parse::<u16>() {
                    Ok(port) if port > 0 => port,
                    _ => return Err(format!("invalid port '{}' in '{}'", p, text)),
                }
            }
            Some(p) => return Err(format!("invalid port '{}' in '{}'", p, text)),
        };

        Ok(Self::new(host, port))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Validated global settings of the agent
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentSettings {
    pub servers: Vec<Endpoint>,
    pub ssl: bool,
    pub interval_secs: u64,
    pub database: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub retention: Option<String>,
    pub tags: Properties,
    pub log_level: String,
    pub log_path: Option<PathBuf>,
}

impl AgentSettings {
    /// Validate and coerce the well-known global keys
    pub fn from_context(context: &Context<'_>) -> ConfigResult<Self> {
        let servers = parse_servers(context)?;

        let ssl = lenient_boolean(context, "ssl", false);

        let interval = context.get_integer("interval", DEFAULT_INTERVAL_SECS)?;
        if interval <= 0 {
            return Err(ConfigError::invalid_value(
                "interval",
                format!("must be positive, got {}", interval),
            ));
        }

        let database = context
            .get_string("database")
            .ok_or_else(|| ConfigError::MissingKey("database".into()))?;
        if database.is_empty() {
            return Err(ConfigError::invalid_value("database", "must not be empty"));
        }

        let user = context.get_string_or("user", DEFAULT_USER);
        if user.is_empty() {
            return Err(ConfigError::invalid_value("user", "must not be empty"));
        }

        let password = context.get_string_or("password", DEFAULT_PASSWORD);
        let retention = context.get_string("retention").map(str::to_string);
        let tags = context.sub_properties("tags.");
        let log_level = context.get_string_or("log.level", DEFAULT_LOG_LEVEL);
        let log_path = context.get_string("log.path").map(PathBuf::from);

        Ok(Self {
            servers,
            ssl,
            interval_secs: interval as u64,
            database: database.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            retention,
            tags,
            log_level: log_level.to_string(),
            log_path,
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn parse_servers(context: &Context<'_>) -> ConfigResult<Vec<Endpoint>> {
    let servers = context
        .get_string("servers")
        .ok_or_else(|| ConfigError::MissingKey("servers".into()))?;
    if servers.trim().is_empty() {
        return Err(ConfigError::invalid_value("servers", "must not be empty"));
    }

    servers
        .split(',')
        .map(|entry| {
            Endpoint::parse(entry, DEFAULT_PORT)
                .map_err(|message| ConfigError::invalid_value("servers", message))
        })
        .collect()
}

/// Lenient boolean read that warns about values that are neither true nor false
fn lenient_boolean(context: &Context<'_>, key: &str, default: bool) -> bool {
    if let Some(value) = context.get_string(key) {
        if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
            tracing::warn!(key, value, "Unrecognized boolean value, treating as false");
        }
    }
    context.get_boolean(key, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn settings(pairs: &[(&str, &str)]) -> ConfigResult<AgentSettings> {
        let props: Properties = pairs.iter().copied().collect();
        AgentSettings::from_context(&Context::new(&props))
    }

    const MINIMAL: [(&str, &str); 2] = [("servers", "localhost"), ("database", "jvm")];

    #[test]
    fn test_defaults() {
        let s = settings(&MINIMAL).unwrap();
        assert_eq!(s.servers, vec![Endpoint::new("localhost", 8086)]);
        assert!(!s.ssl);
        assert_eq!(s.interval_secs, 30);
        assert_eq!(s.interval(), Duration::from_secs(30));
        assert_eq!(s.user, "root");
        assert_eq!(s.password, "root");
        assert_eq!(s.retention, None);
        assert!(s.tags.is_empty());
        assert_eq!(s.log_level, "INFO");
        assert_eq!(s.log_path, None);
    }

    #[test]
    fn test_all_keys() {
        let s = settings(&[
            ("servers", "a:9000, [::1]:9001"),
            ("database", "jvm"),
            ("ssl", "true"),
            ("interval", "10"),
            ("user", "agent"),
            ("password", ""),
            ("retention", "autogen"),
            ("tags.host", "web-01"),
            ("log.level", "DEBUG"),
            ("log.path", "/var/log/agent.log"),
        ])
        .unwrap();

        assert_eq!(
            s.servers,
            vec![Endpoint::new("a", 9000), Endpoint::new("::1", 9001)]
        );
        assert!(s.ssl);
        assert_eq!(s.interval_secs, 10);
        assert_eq!(s.user, "agent");
        assert_eq!(s.password, "");
        assert_eq!(s.retention.as_deref(), Some("autogen"));
        assert_eq!(s.tags.get("host"), Some("web-01"));
        assert_eq!(s.log_level, "DEBUG");
        assert_eq!(s.log_path, Some(PathBuf::from("/var/log/agent.log")));
    }

    #[test]
    fn test_servers_default_port() {
        let s = settings(&[("servers", "host1:9000,host2"), ("database", "jvm")]).unwrap();
        assert_eq!(
            s.servers,
            vec![Endpoint::new("host1", 9000), Endpoint::new("host2", 8086)]
        );
    }

    #[test]
    fn test_missing_servers() {
        let err = settings(&[("database", "jvm")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "servers"));
    }

    #[test]
    fn test_invalid_servers() {
        for bad in ["", "  ", "a,,b", "a:0", "a:70000", "a:http", ":80", "[::1"] {
            let err = settings(&[("servers", bad), ("database", "jvm")]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "servers='{}'", bad);
            assert!(err.to_string().contains("servers"));
        }
    }

    #[test]
    fn test_missing_database() {
        let err = settings(&[("servers", "localhost")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("database"));
    }

    #[test]
    fn test_empty_database() {
        let err = settings(&[("servers", "localhost"), ("database", "")]).unwrap_err();
        assert!(err.to_string().contains("database"));
    }

    #[test]
    fn test_non_positive_interval() {
        for bad in ["0", "-5"] {
            let err = settings(&[("servers", "x"), ("database", "jvm"), ("interval", bad)])
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert!(err.to_string().contains("interval"));
        }
    }

    #[test]
    fn test_non_numeric_interval() {
        let err = settings(&[("servers", "x"), ("database", "jvm"), ("interval", "soon")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumberFormat);
    }

    #[test]
    fn test_empty_user() {
        let err = settings(&[("servers", "x"), ("database", "jvm"), ("user", "")]).unwrap_err();
        assert!(err.to_string().contains("user"));
    }

    #[test]
    fn test_lenient_ssl() {
        let s = settings(&[("servers", "x"), ("database", "jvm"), ("ssl", "yesplease")]).unwrap();
        assert!(!s.ssl);
    }

    #[test]
    fn test_endpoint_parse() {
        assert_eq!(Endpoint::parse("h", 1).unwrap(), Endpoint::new("h", 1));
        assert_eq!(Endpoint::parse(" h:2 ", 1).unwrap(), Endpoint::new("h", 2));
        assert_eq!(Endpoint::parse("[::1]", 1).unwrap(), Endpoint::new("::1", 1));
        assert_eq!(Endpoint::parse("::1", 1).unwrap(), Endpoint::new("::1", 1));
        assert!(Endpoint::parse("[::1]x", 1).is_err());
    }

    #[test]
    fn test_endpoint_port_must_be_digits() {
        for bad in ["h:+80", "h:-80", "h: 80", "h:", "[::1]:+80", "h:8o"] {
            assert!(Endpoint::parse(bad, 1).is_err(), "{}", bad);
        }
        assert_eq!(Endpoint::parse("h:080", 1).unwrap(), Endpoint::new("h", 80));
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(Endpoint::new("h", 8086).to_string(), "h:8086");
        assert_eq!(Endpoint::new("::1", 8086).to_string(), "[::1]:8086");
    }

    #[test]
    fn test_password_not_serialized() {
        let s = settings(&MINIMAL).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["servers"][0]["port"], 8086);
    }
}
