use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("CHARTING_CONFIG").unwrap_or_else(|_| "charting-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [database]
            uri = "postgres://localhost:5432/homeperformance"
            max_connections = 8

            [http]
            bind_addr = "127.0.0.1:8080"

            [metrics]
            bind_addr = "127.0.0.1:9102"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database.max_connections, 8);
        assert_eq!(cfg.http.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.metrics.unwrap().bind_addr, "127.0.0.1:9102");
    }

    #[test]
    fn metrics_section_is_optional() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [database]
            uri = "postgres://localhost:5432/homeperformance"
            max_connections = 4

            [http]
            bind_addr = "0.0.0.0:8080"
            "#,
        )
        .unwrap();
        assert!(cfg.metrics.is_none());
    }
}
