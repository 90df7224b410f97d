//! Pagination over ordered query results

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Page size of every paginated listing
pub const PAGE_SIZE: i64 = 10;

/// Query parameters of paginated listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<i64>,
}

/// Slice of an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub number: i64,
    pub per_page: i64,
    /// Number of records across all pages
    pub total: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// A requested page, optionally over a result set capped at `cap` records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: i64,
    per_page: i64,
    cap: Option<i64>,
}

impl PageRequest {
    pub fn new(number: Option<i64>, per_page: i64) -> Self {
        Self {
            number: number.unwrap_or(1),
            per_page,
            cap: None,
        }
    }

    /// Only the first `cap` records take part in pagination
    pub fn capped(mut self, cap: i64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Resolve against the number of matching records.
    ///
    /// Page 1 of an empty result is valid; any other page outside
    /// `1..=num_pages` is `NotFound`.
    pub fn resolve(&self, matching: i64) -> AppResult<(Window, PageInfo)> {
        let total = match self.cap {
            Some(cap) => matching.min(cap),
            None => matching,
        }
        .max(0);
        let num_pages = ((total + self.per_page - 1) / self.per_page).max(1);

        if self.number < 1 || self.number > num_pages {
            return Err(AppError::NotFound(format!("Invalid page ({})", self.number)));
        }

        let offset = (self.number - 1) * self.per_page;
        let limit = self.per_page.min(total - offset).max(0);

        Ok((
            Window { offset, limit },
            PageInfo {
                number: self.number,
                per_page: self.per_page,
                total,
                num_pages,
                has_next: self.number < num_pages,
                has_previous: self.number > 1,
            },
        ))
    }
}
