//! Runtime settings, read once from the environment at startup.

use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "academia.sqlite";
const DEFAULT_EMAIL_SUFFIX: &str = "@gst.sies.edu.in";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10 MB

/// Staff account created (or whose password is reset) when the server starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Institutional suffix every student email must end with.
    pub email_suffix: String,
    pub admin: Option<AdminBootstrap>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            email_suffix: DEFAULT_EMAIL_SUFFIX.to_string(),
            admin: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, String> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests do not
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("ACADEMIA_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("ACADEMIA_PORT") {
            config.port = port
                .parse()
                .map_err(|_| format!("ACADEMIA_PORT is not a valid port: {}", port))?;
        }
        if let Some(path) = lookup("ACADEMIA_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(suffix) = lookup("ACADEMIA_EMAIL_SUFFIX") {
            config.email_suffix = suffix;
        }
        if let Some(limit) = lookup("ACADEMIA_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.parse().map_err(|_| {
                format!("ACADEMIA_MAX_UPLOAD_BYTES is not a byte count: {}", limit)
            })?;
        }

        config.admin = match (lookup("ACADEMIA_ADMIN_USER"), lookup("ACADEMIA_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.trim().is_empty() => {
                Some(AdminBootstrap {
                    username: username.trim().to_string(),
                    password,
                })
            }
            (Some(_), None) => {
                return Err("ACADEMIA_ADMIN_USER is set without ACADEMIA_ADMIN_PASSWORD".into())
            }
            _ => None,
        };

        Ok(config)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.email_suffix, "@gst.sies.edu.in");
    }

    #[test]
    fn overrides_and_admin_bootstrap_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("ACADEMIA_PORT", "9090"),
            ("ACADEMIA_ADMIN_USER", " root "),
            ("ACADEMIA_ADMIN_PASSWORD", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.admin,
            Some(AdminBootstrap {
                username: "root".into(),
                password: "s3cret".into()
            })
        );
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("ACADEMIA_PORT", "eighty")])).unwrap_err();
        assert!(err.contains("ACADEMIA_PORT"));
    }

    #[test]
    fn admin_user_without_password_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("ACADEMIA_ADMIN_USER", "root")])).is_err());
    }
}
