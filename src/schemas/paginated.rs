use serde::{Deserialize, Serialize};

use super::read::UserFileRead;
use crate::errors::{FieldViolation, PageWindowError, SchemaError, ValidationError};
use crate::models::StoredUserFile;

/// A 1-indexed page position with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        if page == 0 {
            violations.push(FieldViolation::new(
                "page",
                "range",
                "Field 'page' must be at least 1",
            ));
        }
        if size == 0 {
            violations.push(FieldViolation::new(
                "size",
                "range",
                "Field 'size' must be at least 1",
            ));
        }

        if violations.is_empty() {
            Ok(Self { page, size })
        } else {
            Err(ValidationError::new(violations))
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Rows to skip in the underlying query.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> u64 {
        self.size
    }

    pub fn next_page(&self, total: u64) -> Option<u64> {
        (self.page.saturating_mul(self.size) < total).then(|| self.page + 1)
    }

    pub fn prev_page(&self) -> Option<u64> {
        (self.page > 1).then(|| self.page - 1)
    }
}

/// One page of file records plus the cursors around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedUserFileList {
    pub total: u64,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
    pub data: Vec<UserFileRead>,
}

impl PaginatedUserFileList {
    /// Builds a page from rows already shaped for output.
    ///
    /// A page past the end is not an error: it yields empty `data` with no
    /// next page, leaving it to the caller whether to treat that as a 404.
    pub fn from_page(
        data: Vec<UserFileRead>,
        total: u64,
        request: PageRequest,
    ) -> Result<Self, PageWindowError> {
        let rows = data.len();
        let past_end = rows > 0 && request.offset().saturating_add(rows as u64) > total;
        if rows as u64 > request.size() || rows as u64 > total || past_end {
            let err = PageWindowError {
                rows,
                size: request.size(),
                total,
            };
            log::error!("{}", err);
            return Err(err);
        }

        if rows == 0 && request.page() > 1 {
            log::debug!(
                "page {} is past the end of {} user files",
                request.page(),
                total
            );
        }

        Ok(Self {
            total,
            next_page: request.next_page(total),
            prev_page: request.prev_page(),
            data,
        })
    }

    /// Builds a page straight from a query result window, shaping each row.
    pub fn from_window<I>(rows: I, total: u64, request: PageRequest) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = StoredUserFile>,
    {
        let data = rows
            .into_iter()
            .map(UserFileRead::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_page(data, total, request)?)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
