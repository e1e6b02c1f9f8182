//! The canonical list filter and its normalization rules
//!
//! # Example
//!
//! ```rust
//! use api_envelope::filter::{FilterOptions, SortDirection};
//!
//! let filter = FilterOptions::new()
//!     .with_page(0)
//!     .with_limit(999)
//!     .with_search("  alice ")
//!     .validated(100);
//!
//! assert_eq!(filter.page, 1);
//! assert_eq!(filter.limit, 100);
//! assert_eq!(filter.offset, Some(0));
//! assert_eq!(filter.search, "alice");
//! assert_eq!(filter.sort_direction(), SortDirection::Desc);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dynamic::DynamicValue;
use crate::config::{PaginationConfig, DEFAULT_MAX_LIMIT};

/// Sort direction for list queries
///
/// Serialized as `"ASC"` / `"DESC"`. Anything that is not recognizably
/// ascending or descending normalizes to [`SortDirection::Desc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending (A-Z, oldest first)
    #[serde(alias = "asc")]
    Asc,
    /// Descending (Z-A, newest first)
    #[default]
    #[serde(alias = "desc")]
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse that never fails
    ///
    /// ```rust
    /// use api_envelope::filter::SortDirection;
    ///
    /// assert_eq!(SortDirection::parse_lenient("asc"), SortDirection::Asc);
    /// assert_eq!(SortDirection::parse_lenient("DeSc"), SortDirection::Desc);
    /// assert_eq!(SortDirection::parse_lenient("foo"), SortDirection::Desc);
    /// assert_eq!(SortDirection::parse_lenient(""), SortDirection::Desc);
    /// ```
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    /// SQL ORDER BY fragment
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Query filter shared by list endpoints
///
/// Fixed attributes serialize under their external parameter names and are
/// omitted when empty. Parameters that do not match a fixed attribute are kept
/// in [`dynamic_fields`](Self::dynamic_fields), which is never serialized.
///
/// A filter is normally produced by [`parse_parameters`](super::parse_parameters),
/// which already applies [`validate`](Self::validate). Filters built by hand
/// should be validated before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Page number (1-indexed after validation)
    #[serde(skip_serializing_if = "is_zero")]
    pub page: i64,

    /// Page size, bounded by the configured maximum after validation
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: i64,

    /// Explicit row offset; derived from page and limit when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Free-text search (`q`)
    #[serde(rename = "q", skip_serializing_if = "String::is_empty")]
    pub search: String,

    /// Sort direction (`sort`)
    #[serde(rename = "sort", skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,

    /// Column to sort by
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort_by: String,

    /// Start of the date range, as supplied by the client
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_date: String,

    /// End of the date range, as supplied by the client
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_date: String,

    /// Item type (`type`)
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub item_type: String,

    /// Item status
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,

    /// Category names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    /// Owning entity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,

    /// Explicit entity ids
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<Uuid>,

    /// Parameters not recognized as fixed attributes
    #[serde(skip)]
    pub dynamic_fields: HashMap<String, DynamicValue>,
}

impl FilterOptions {
    /// Create an empty filter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set an explicit offset
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the search text
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the sort column and direction
    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = sort_by.into();
        self.sort_direction = Some(direction);
        self
    }

    /// Set the categories
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Add a dynamic field
    #[must_use]
    pub fn with_dynamic_field(mut self, key: impl Into<String>, value: impl Into<DynamicValue>) -> Self {
        self.set_dynamic_field(key, value);
        self
    }

    /// Normalize the filter in place
    ///
    /// Never fails; out-of-range input is coerced rather than rejected:
    ///
    /// - `page` is raised to at least 1
    /// - `limit` is clamped to `[1, max_limit]`; a `max_limit` below 1 means 100
    /// - free-text fields are trimmed and blank categories dropped
    /// - the sort direction defaults to `DESC`
    /// - `offset`, when unset, becomes `(page - 1) * limit`
    ///
    /// Applying it twice yields the same filter as applying it once.
    pub fn validate(&mut self, max_limit: i64) -> &mut Self {
        if self.page < 1 {
            self.page = 1;
        }

        let max_limit = if max_limit < 1 {
            DEFAULT_MAX_LIMIT
        } else {
            max_limit
        };
        self.limit = self.limit.clamp(1, max_limit);

        trim_in_place(&mut self.search);
        trim_in_place(&mut self.sort_by);
        trim_in_place(&mut self.item_type);
        trim_in_place(&mut self.status);
        trim_in_place(&mut self.start_date);
        trim_in_place(&mut self.end_date);

        self.sort_direction = Some(self.sort_direction.unwrap_or_default());

        if self.offset.is_none() {
            self.offset = Some((self.page - 1).saturating_mul(self.limit));
        }

        self.categories = self
            .categories
            .iter()
            .map(|category| category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect();

        self
    }

    /// Normalize using the page size cap from configuration
    pub fn validate_with(&mut self, config: &PaginationConfig) -> &mut Self {
        self.validate(config.effective_max_limit())
    }

    /// By-value variant of [`validate`](Self::validate)
    #[must_use]
    pub fn validated(mut self, max_limit: i64) -> Self {
        self.validate(max_limit);
        self
    }

    /// The sort direction, `DESC` when unset
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction.unwrap_or_default()
    }

    /// The row offset, derived from page and limit when unset
    pub fn offset(&self) -> i64 {
        self.offset
            .unwrap_or_else(|| (self.page.max(1) - 1).saturating_mul(self.limit.max(1)))
    }

    /// Look up a dynamic field
    pub fn dynamic_field(&self, key: &str) -> Option<&DynamicValue> {
        self.dynamic_fields.get(key)
    }

    /// Insert or replace a dynamic field
    pub fn set_dynamic_field(&mut self, key: impl Into<String>, value: impl Into<DynamicValue>) {
        self.dynamic_fields.insert(key.into(), value.into());
    }

    /// A dynamic field holding a single identifier
    ///
    /// Returns `None` when the key is missing or holds anything else.
    pub fn dynamic_uuid(&self, key: &str) -> Option<Uuid> {
        self.dynamic_field(key).and_then(DynamicValue::as_uuid)
    }

    /// A dynamic field holding a list of identifiers
    pub fn dynamic_uuids(&self, key: &str) -> Option<&[Uuid]> {
        self.dynamic_field(key).and_then(DynamicValue::as_uuids)
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
