use serde::Deserialize;
use validator::Validate;

use crate::config::ListingConfig;
use crate::errors::{FieldViolation, ValidationError};
use crate::schemas::PageRequest;

/// `?page=&size=` on list endpoints. Both are optional; pages start at 1.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1))]
    pub size: Option<u64>,
}

impl PageQuery {
    /// Fills gaps from `config` and enforces its maximum page size.
    pub fn resolve(&self, config: &ListingConfig) -> Result<PageRequest, ValidationError> {
        let mut violations = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => ValidationError::from(errors).into_violations(),
        };

        if let Some(size) = self.size {
            if size > config.max_page_size {
                violations.push(FieldViolation::new(
                    "size",
                    "range",
                    format!("Field 'size' must be at most {}", config.max_page_size),
                ));
            }
        }

        if !violations.is_empty() {
            let err = ValidationError::new(violations);
            log::debug!("rejected page query: {}", err);
            return Err(err);
        }

        PageRequest::new(
            self.page.unwrap_or(1),
            self.size.unwrap_or(config.default_page_size),
        )
    }
}
