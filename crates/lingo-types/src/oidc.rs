use std::collections::HashMap;

use serde::Deserialize;

use crate::error::Result;

pub const GOOGLE_PROVIDER: &str = "google";
pub const GOOGLE_ISSUER_URL: &str = "https://accounts.google.com";

#[derive(Debug, Deserialize, Clone)]
pub struct OIDCProviderConfig {
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OIDCConfig {
    #[serde(default)]
    providers: HashMap<String, OIDCProviderConfig>,
}

impl OIDCConfig {
    pub fn get_provider(&self, name: &str) -> Option<&OIDCProviderConfig> {
        self.providers.get(name)
    }

    pub fn available_providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registers Google provider, replacing one loaded from file
    pub fn with_google(mut self, client_id: String, client_secret: Option<String>) -> Self {
        self.providers.insert(
            GOOGLE_PROVIDER.to_string(),
            OIDCProviderConfig {
                issuer_url: GOOGLE_ISSUER_URL.to_string(),
                client_id,
                client_secret,
            },
        );
        self
    }

    pub fn load_config(file_source: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file_source))
            .build()?;
        let config = config.try_deserialize::<OIDCConfig>()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let config = OIDCConfig::load_config("../../test-data/oidc-config").unwrap();
        assert_eq!(config.available_providers().len(), 1);
        let google = config.get_provider(GOOGLE_PROVIDER).unwrap();
        assert_eq!(google.client_id, "ABCDE");
        assert_eq!(google.client_secret, Some("12345".into()))
    }

    #[test]
    fn test_google_from_env_values() {
        let config = OIDCConfig::default().with_google("client".into(), None);
        assert!(!config.is_empty());
        let google = config.get_provider(GOOGLE_PROVIDER).unwrap();
        assert_eq!(google.issuer_url, GOOGLE_ISSUER_URL);
        assert_eq!(google.client_secret, None);
    }
}
