use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub franchise: FranchiseConfig,
    pub features: FeatureConfig,
    pub firestore: FirestoreConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The single franchise whose menu this deployment serves.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FranchiseConfig {
    pub id: String,
    pub app_name: String,
    pub currency: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FeatureConfig {
    pub enable_search: bool,
    pub enable_filtering: bool,
    pub enable_sorting: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            enable_search: true,
            enable_filtering: true,
            enable_sorting: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// "json" or "pretty"
    pub format: String,
    /// Daily rolling log files are written here when set.
    pub directory: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(Self::environment())
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// `APP_<SECTION>__<KEY>`, e.g. `APP_FRANCHISE__ID`.
    fn environment() -> Environment {
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("franchise.id", "dcjQSyneEVotjl9dQwFA")?
            .set_default("franchise.app_name", "Restaurant Menu")?
            .set_default("franchise.currency", "₹")?
            .set_default("features.enable_search", true)?
            .set_default("features.enable_filtering", true)?
            .set_default("features.enable_sorting", true)?
            .set_default("firestore.base_url", "https://firestore.googleapis.com/v1")?
            .set_default("firestore.project_id", "restpossys")?
            .set_default("firestore.timeout_seconds", 10)?
            .set_default("firestore.page_size", 300)?
            .set_default("session.ttl_seconds", 6 * 60 * 60)?
            .set_default("session.cleanup_interval_seconds", 300)?
            .set_default("logging.format", "json")?;

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_without_sources() {
        let config = Settings::with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.franchise.id, "dcjQSyneEVotjl9dQwFA");
        assert_eq!(settings.franchise.currency, "₹");
        assert!(settings.features.enable_search);
        assert!(settings.firestore.api_key.is_none());
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn test_env_vars_use_single_underscore_after_prefix() {
        let vars: config::Map<String, String> = [
            ("APP_FRANCHISE__ID", "riverside-diner"),
            ("APP_SERVER__PORT", "9090"),
            ("APP_FEATURES__ENABLE_SORTING", "false"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Settings::with_defaults(Config::builder())
            .unwrap()
            .add_source(Settings::environment().source(Some(vars)))
            .build()
            .unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.franchise.id, "riverside-diner");
        assert_eq!(settings.server.port, 9090);
        assert!(!settings.features.enable_sorting);
        assert_eq!(settings.franchise.app_name, "Restaurant Menu");
    }

    #[test]
    fn test_override_franchise_id() {
        let config = Settings::with_defaults(Config::builder())
            .unwrap()
            .set_override("franchise.id", "other-franchise")
            .unwrap()
            .build()
            .unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.franchise.id, "other-franchise");
    }
}
