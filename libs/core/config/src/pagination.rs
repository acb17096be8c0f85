use crate::{ConfigError, FromEnv, env_parse_or};

/// Listing defaults shared by every searchable resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size used when a request does not carry a valid one
    pub default_per_page: usize,
}

impl PaginationConfig {
    pub const DEFAULT_PER_PAGE: usize = 15;
}

impl FromEnv for PaginationConfig {
    /// Reads `DEFAULT_PER_PAGE` (defaults to 15, must be positive)
    fn from_env() -> Result<Self, ConfigError> {
        let default_per_page = env_parse_or("DEFAULT_PER_PAGE", Self::DEFAULT_PER_PAGE)?;

        if default_per_page == 0 {
            return Err(ConfigError::ParseError {
                key: "DEFAULT_PER_PAGE".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self { default_per_page })
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}
