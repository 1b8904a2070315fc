use std::env;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE_VAR: &str = "USER_FILES_DEFAULT_PAGE_SIZE";
pub const MAX_PAGE_SIZE_VAR: &str = "USER_FILES_MAX_PAGE_SIZE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("default page size {default} exceeds maximum page size {max}")]
    DefaultAboveMax { default: u64, max: u64 },
}

/// Page sizing for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl ListingConfig {
    /// Reads the listing settings from the process environment, loading a
    /// `.env` file first when one is present. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            default_page_size: read_size(&lookup, DEFAULT_PAGE_SIZE_VAR)?
                .unwrap_or(defaults.default_page_size),
            max_page_size: read_size(&lookup, MAX_PAGE_SIZE_VAR)?
                .unwrap_or(defaults.max_page_size),
        };

        if config.default_page_size > config.max_page_size {
            return Err(ConfigError::DefaultAboveMax {
                default: config.default_page_size,
                max: config.max_page_size,
            });
        }

        log::debug!(
            "listing config: default page size {}, max page size {}",
            config.default_page_size,
            config.max_page_size
        );

        Ok(config)
    }
}

fn read_size<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(size) if size > 0 => Ok(Some(size)),
        _ => Err(ConfigError::NotANumber { var, value: raw }),
    }
}
