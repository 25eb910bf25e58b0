//! Profile management
//!
//! A profile is a named set of credentials and endpoint settings stored in the
//! profile file. [`Profile::client_config`] turns one into a [`ClientConfig`].

use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, ConfigManager, DEFAULT_REGION, Protocol, TimeoutConfig};
use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// A named set of credentials and endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// STS session token for temporary credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,

    /// Region, e.g. `bj`, `gz`, `su`
    #[serde(default = "default_region")]
    pub region: String,

    /// Protocol for derived endpoints
    #[serde(default)]
    pub protocol: Protocol,

    /// Explicit endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(
        name: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
            region: default_region(),
            protocol: Protocol::default(),
            endpoint: None,
            timeout: None,
        }
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }

    /// Build a client configuration, validating the credentials
    pub fn client_config(&self) -> Result<ClientConfig> {
        let credentials = match &self.session_token {
            Some(token) => Credentials::with_session_token(&self.access_key, &self.secret_key, token)?,
            None => Credentials::new(&self.access_key, &self.secret_key)?,
        };

        let mut config = ClientConfig::new(credentials)
            .with_protocol(self.protocol)
            .with_region(&self.region)
            .with_timeout(self.timeout_config());
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        Ok(config)
    }
}

/// Manager for profile operations
#[derive(Debug)]
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add a profile; fails if the name is taken
    pub fn add(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;
        if config.profiles.iter().any(|p| p.name == profile.name) {
            return Err(Error::ProfileExists(profile.name));
        }
        config.profiles.push(profile);
        self.config_manager.save(&config)
    }

    /// Add or replace a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;
        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);
        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}
