use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/kopilka.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token for the remote store; usually injected via
    /// `KOPILKA_TOKEN` rather than written to the config file.
    pub token: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: String::new(),
            level: "info".to_string(),
        }
    }
}

pub fn load(path: Option<&str>) -> Result<AppConfig, config::ConfigError> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("KOPILKA"));
    builder.build()?.try_deserialize()
}
