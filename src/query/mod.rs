use serde::Deserialize;
use thiserror::Error;

use crate::config::PagingConfig;

/// Fields the store may sort by. A closed set keeps the ORDER BY rendering
/// free of injection surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Amount,
    Id,
}

impl SortField {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortField::Amount => "amount",
            SortField::Id => "id",
        }
    }

    fn parse(token: &str) -> Result<Self, QueryError> {
        match token.to_ascii_lowercase().as_str() {
            "amount" => Ok(SortField::Amount),
            "id" => Ok(SortField::Id),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Raw paging/sorting parameters exactly as they arrive on the query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

/// Canonical bounded query descriptor derived from `ListParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardQuery {
    pub offset: i64,
    pub limit: i64,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid page number: {0}")]
    InvalidPage(String),
    #[error("invalid page size: {0}")]
    InvalidSize(String),
    #[error("cannot sort by field: {0}")]
    UnknownSortField(String),
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),
}

pub struct QueryResolver;

impl QueryResolver {
    /// Normalize raw request parameters into a canonical query.
    ///
    /// Missing values take defaults (page 0, configured size, amount ascending);
    /// malformed values fail the request instead of being silently defaulted.
    /// Sizes above the configured maximum are clamped.
    pub fn resolve(params: &ListParams, paging: &PagingConfig) -> Result<CardQuery, QueryError> {
        let page = match &params.page {
            None => 0,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 0)
                .ok_or_else(|| QueryError::InvalidPage(raw.clone()))?,
        };

        let size = match &params.size {
            None => paging.default_size,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| QueryError::InvalidSize(raw.clone()))?,
        };
        let limit = size.min(paging.max_size);

        let (sort_field, sort_direction) = match &params.sort {
            None => (SortField::Amount, SortDirection::Asc),
            Some(raw) => Self::parse_sort(raw)?,
        };

        Ok(CardQuery {
            offset: page.saturating_mul(limit),
            limit,
            sort_field,
            sort_direction,
        })
    }

    /// Parse a `field` or `field,direction` sort token.
    fn parse_sort(raw: &str) -> Result<(SortField, SortDirection), QueryError> {
        let mut parts = raw.splitn(2, ',');
        let field = SortField::parse(parts.next().unwrap_or("").trim())?;
        let direction = match parts.next() {
            None => SortDirection::Asc,
            Some(dir) => match dir.trim().to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => return Err(QueryError::InvalidSortDirection(other.to_string())),
            },
        };
        Ok((field, direction))
    }
}
