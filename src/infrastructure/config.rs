use serde::Deserialize;
use std::env;
use url::Url;

use super::sparql::RequestMethod;

pub const WIKIDATA_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub sparql: SparqlConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SparqlConfig {
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    #[serde(default)]
    pub method: RequestMethod,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for outbound queries.
    #[serde(default = "default_system_proxy")]
    pub system_proxy: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            agent_name: default_agent_name(),
            method: RequestMethod::default(),
            system_proxy: default_system_proxy(),
        }
    }
}

impl SparqlConfig {
    /// Client label sent as the `User-Agent` of every outbound query.
    pub fn user_agent(&self) -> String {
        format!(
            "{} {}/{}",
            self.agent_name,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    }
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("app.cors_origins"),
            );
        let cfg = builder.build()?;
        let mut config: Config = cfg.try_deserialize()?;

        if env::var("RELAY__APP__HOST").is_err() {
            if let Ok(host) = env::var("HOST") {
                if !host.trim().is_empty() {
                    config.app.host = host;
                }
            }
        }

        if env::var("RELAY__APP__PORT").is_err() {
            if let Ok(port) = env::var("PORT") {
                if !port.trim().is_empty() {
                    config.app.port = port.trim().parse().map_err(|_| {
                        config::ConfigError::Message(format!("Invalid PORT value: {port}"))
                    })?;
                }
            }
        }

        if let Err(err) = Url::parse(&config.sparql.endpoint_url) {
            return Err(config::ConfigError::Message(format!(
                "Invalid SPARQL endpoint URL {}: {err}",
                config.sparql.endpoint_url
            )));
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_endpoint_url() -> String {
    WIKIDATA_SPARQL_ENDPOINT.to_string()
}

fn default_agent_name() -> String {
    "WDQS-example".to_string()
}

fn default_system_proxy() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::{Config, WIKIDATA_SPARQL_ENDPOINT};
    use crate::infrastructure::sparql::RequestMethod;
    use config::ConfigError;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        for key in [
            "RELAY__APP__HOST",
            "RELAY__APP__PORT",
            "RELAY__SPARQL__ENDPOINT_URL",
            "RELAY__SPARQL__METHOD",
            "RELAY__APP__CORS_ORIGINS",
            "HOST",
            "PORT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_point_at_wikidata() {
        clear_env_vars();

        let config = Config::from_env().expect("expected configuration to load");

        assert_eq!(config.sparql.endpoint_url, WIKIDATA_SPARQL_ENDPOINT);
        assert_eq!(config.sparql.method, RequestMethod::Get);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert!(config.app.cors_origins.is_empty());
    }

    #[test]
    #[serial]
    fn prefixed_variables_override_defaults() {
        clear_env_vars();
        env::set_var("RELAY__APP__PORT", "9090");
        env::set_var("RELAY__SPARQL__ENDPOINT_URL", "http://localhost:3030/ds/sparql");
        env::set_var("RELAY__SPARQL__METHOD", "POST");

        let config = Config::from_env().expect("expected configuration to load");

        assert_eq!(config.app.port, 9090);
        assert_eq!(config.sparql.endpoint_url, "http://localhost:3030/ds/sparql");
        assert_eq!(config.sparql.method, RequestMethod::Post);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn cors_origins_are_read_as_a_comma_separated_list() {
        clear_env_vars();
        env::set_var("RELAY__APP__CORS_ORIGINS", "https://a.example");

        let config = Config::from_env().expect("expected configuration to load");
        assert_eq!(config.app.cors_origins, vec!["https://a.example".to_string()]);

        env::set_var(
            "RELAY__APP__CORS_ORIGINS",
            "https://a.example,https://maps.example.net",
        );

        let config = Config::from_env().expect("expected configuration to load");
        assert_eq!(
            config.app.cors_origins,
            vec![
                "https://a.example".to_string(),
                "https://maps.example.net".to_string()
            ]
        );

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn falls_back_to_plain_host_and_port() {
        clear_env_vars();
        env::set_var("HOST", "127.0.0.1");
        env::set_var("PORT", "8081");

        let config = Config::from_env().expect("expected configuration to load");

        assert_eq!(config.bind_address(), "127.0.0.1:8081");

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn prefixed_port_wins_over_plain_port() {
        clear_env_vars();
        env::set_var("RELAY__APP__PORT", "7000");
        env::set_var("PORT", "8081");

        let config = Config::from_env().expect("expected configuration to load");

        assert_eq!(config.app.port, 7000);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn errors_when_endpoint_url_is_invalid() {
        clear_env_vars();
        env::set_var("RELAY__SPARQL__ENDPOINT_URL", "not a url");

        let error = Config::from_env().expect_err("expected configuration to fail");

        match error {
            ConfigError::Message(message) => {
                assert!(message.starts_with("Invalid SPARQL endpoint URL not a url"))
            }
            other => panic!("unexpected error: {:?}", other),
        }

        clear_env_vars();
    }

    #[test]
    fn user_agent_names_agent_and_version() {
        let config = Config::default();

        assert_eq!(
            config.sparql.user_agent(),
            format!("WDQS-example wikidata_relay/{}", env!("CARGO_PKG_VERSION"))
        );
    }
}
