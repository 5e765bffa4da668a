use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub host: Host,
    pub subword_tokenizer: Option<PathBuf>,
    pub hosted: HostedConfig,
    pub allowed_hosts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: u64,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: Host::parse(
                &lookup("TOKVIZ_HOST").unwrap_or_else(|| format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT)),
            ),
            subword_tokenizer: lookup("TOKVIZ_SUBWORD_TOKENIZER")
                .filter(|p| !p.trim().is_empty())
                .map(|p| expand_home(&p)),
            hosted: HostedConfig {
                endpoint: lookup("TOKVIZ_HOSTED_URL"),
                api_key: lookup("TOKVIZ_HOSTED_API_KEY"),
                model: lookup("TOKVIZ_HOSTED_MODEL").unwrap_or_else(|| "default".to_string()),
                timeout: lookup("TOKVIZ_HOSTED_TIMEOUT")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(10),
            },
            allowed_hosts: lookup("TOKVIZ_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl Host {
    pub fn parse(value: &str) -> Self {
        let value = value
            .trim_start_matches("http://")
            .trim_start_matches("https://");

        let (host, port) = match value.rsplit_once(':') {
            Some((host, port)) => (host.to_string(), port.parse().unwrap_or(DEFAULT_PORT)),
            None => (value.to_string(), DEFAULT_PORT),
        };

        let host = if host.is_empty() { DEFAULT_HOST.to_string() } else { host };
        Self { host, port }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.host, Host { host: "127.0.0.1".into(), port: 5000 });
        assert!(config.subword_tokenizer.is_none());
        assert!(config.hosted.api_key.is_none());
        assert_eq!(config.hosted.model, "default");
        assert_eq!(config.hosted.timeout, 10);
        assert!(config.allowed_hosts.is_empty());
    }

    #[test]
    fn test_host_parsing() {
        assert_eq!(Host::parse("0.0.0.0:8080").addr(), "0.0.0.0:8080");
        assert_eq!(Host::parse("http://example.com").addr(), "example.com:5000");
        assert_eq!(Host::parse(":9000").addr(), "127.0.0.1:9000");
        assert_eq!(Host::parse("localhost:nope").port, 5000);
    }

    #[test]
    fn test_origins_and_timeout() {
        let config = config(&[
            ("TOKVIZ_ORIGINS", "tok.example.com, ,intranet:5000"),
            ("TOKVIZ_HOSTED_TIMEOUT", "3"),
        ]);
        assert_eq!(config.allowed_hosts, vec!["tok.example.com", "intranet:5000"]);
        assert_eq!(config.hosted.timeout, 3);
    }

    #[test]
    fn test_absolute_tokenizer_path_kept() {
        let config = config(&[("TOKVIZ_SUBWORD_TOKENIZER", "/models/t5/tokenizer.json")]);
        assert_eq!(
            config.subword_tokenizer,
            Some(PathBuf::from("/models/t5/tokenizer.json"))
        );
    }
}
