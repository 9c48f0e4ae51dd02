//! Session configuration for the hook layer
//!
//! Environment reads happen once, here, instead of being scattered through
//! the hooks as ambient globals.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pipeline settings for one host session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Production (show) code
    pub production: String,

    /// Login of the user driving the session
    pub user_login: String,

    /// Value stamped into the publish-flag field when publishing
    pub publish_flag: String,

    /// Name of the template field carrying the publish flag
    pub publish_flag_field: String,

    /// Name of the template field carrying the user
    pub user_field: String,

    /// Fields allowed to vary when enumerating sibling work files
    pub vary_fields: Vec<String>,
}

impl PipelineConfig {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(production) = std::env::var("PROD") {
            config.production = production;
        }
        if let Ok(user) = std::env::var("USER") {
            config.user_login = user;
        }
        Ok(config)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            production: "show".to_string(),
            user_login: "nobody".to_string(),
            publish_flag: "publi".to_string(),
            publish_flag_field: "flag".to_string(),
            user_field: "user".to_string(),
            vary_fields: vec![
                "version".to_string(),
                "user".to_string(),
                "flag".to_string(),
            ],
        }
    }
}
