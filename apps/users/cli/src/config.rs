use core_config::{FromEnv, pagination::PaginationConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub pagination: PaginationConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let pagination = PaginationConfig::from_env()?; // Uses default: DEFAULT_PER_PAGE=15

        Ok(Self {
            environment,
            pagination,
        })
    }
}
