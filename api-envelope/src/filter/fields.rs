//! The fixed filter attributes and their coercion rules
//!
//! Each attribute is listed explicitly with its external parameter name and
//! target kind. Parsing and cache-key generation both walk [`FixedField::ALL`].

use uuid::Uuid;

use super::options::{FilterOptions, SortDirection};
use crate::error::FieldConversionError;

/// Coercion target of a fixed attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Assigned verbatim
    Text,
    /// Base-10 integer; zero counts as absent
    Integer,
    /// Base-10 integer where any set value, zero included, is present
    OptionalInteger,
    /// `ASC` / `DESC`, parsed leniently
    SortDirection,
    /// Strict UUID
    Identifier,
    /// Comma-separated strings, each trimmed
    TextList,
    /// Comma-separated UUIDs; one bad element fails the whole value
    IdentifierList,
}

/// A statically known filter attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedField {
    Page,
    Limit,
    Offset,
    Search,
    SortDirection,
    SortBy,
    StartDate,
    EndDate,
    ItemType,
    Status,
    Categories,
    OwnerId,
    Ids,
}

impl FixedField {
    /// Every fixed attribute
    pub const ALL: [FixedField; 13] = [
        Self::Page,
        Self::Limit,
        Self::Offset,
        Self::Search,
        Self::SortDirection,
        Self::SortBy,
        Self::StartDate,
        Self::EndDate,
        Self::ItemType,
        Self::Status,
        Self::Categories,
        Self::OwnerId,
        Self::Ids,
    ];

    /// Attribute name on [`FilterOptions`]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Limit => "limit",
            Self::Offset => "offset",
            Self::Search => "search",
            Self::SortDirection => "sort_direction",
            Self::SortBy => "sort_by",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::ItemType => "item_type",
            Self::Status => "status",
            Self::Categories => "categories",
            Self::OwnerId => "owner_id",
            Self::Ids => "ids",
        }
    }

    /// External query parameter name
    pub const fn param(&self) -> &'static str {
        match self {
            Self::Search => "q",
            Self::SortDirection => "sort",
            Self::ItemType => "type",
            other => other.name(),
        }
    }

    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Page | Self::Limit => FieldKind::Integer,
            Self::Offset => FieldKind::OptionalInteger,
            Self::SortDirection => FieldKind::SortDirection,
            Self::OwnerId => FieldKind::Identifier,
            Self::Categories => FieldKind::TextList,
            Self::Ids => FieldKind::IdentifierList,
            Self::Search
            | Self::SortBy
            | Self::StartDate
            | Self::EndDate
            | Self::ItemType
            | Self::Status => FieldKind::Text,
        }
    }

    /// Find the attribute behind an external parameter name
    ///
    /// ```rust
    /// use api_envelope::filter::FixedField;
    ///
    /// assert_eq!(FixedField::from_param("q"), Some(FixedField::Search));
    /// assert_eq!(FixedField::from_param("search"), None);
    /// ```
    pub fn from_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.param() == param)
    }

    /// Coerce `raw` and store it on `filter`
    ///
    /// On failure `filter` is left untouched.
    pub fn assign(&self, filter: &mut FilterOptions, raw: &str) -> Result<(), FieldConversionError> {
        let fail = |reason: String| FieldConversionError::new(self.name(), self.param(), reason);

        match self {
            Self::Page => filter.page = parse_integer(raw).map_err(fail)?,
            Self::Limit => filter.limit = parse_integer(raw).map_err(fail)?,
            Self::Offset => filter.offset = Some(parse_integer(raw).map_err(fail)?),
            Self::Search => filter.search = raw.to_string(),
            Self::SortDirection => filter.sort_direction = Some(SortDirection::parse_lenient(raw)),
            Self::SortBy => filter.sort_by = raw.to_string(),
            Self::StartDate => filter.start_date = raw.to_string(),
            Self::EndDate => filter.end_date = raw.to_string(),
            Self::ItemType => filter.item_type = raw.to_string(),
            Self::Status => filter.status = raw.to_string(),
            Self::Categories => filter.categories = split_text_list(raw),
            Self::OwnerId => filter.owner_id = Some(parse_identifier(raw).map_err(fail)?),
            Self::Ids => filter.ids = parse_identifier_list(raw).map_err(fail)?,
        }
        Ok(())
    }

    /// Canonical cache-key form of this attribute, `None` when absent
    ///
    /// Empty strings, zero integers, nil identifiers and empty lists are all
    /// absent. A zero `page` or `limit` is therefore indistinguishable from an
    /// unset one. `offset` is the exception: an explicit `0` is kept.
    pub fn canonical(&self, filter: &FilterOptions) -> Option<String> {
        match self {
            Self::Page => non_zero(filter.page),
            Self::Limit => non_zero(filter.limit),
            Self::Offset => filter.offset.map(|offset| offset.to_string()),
            Self::Search => non_empty(&filter.search),
            Self::SortDirection => filter.sort_direction.map(|dir| dir.as_sql().to_string()),
            Self::SortBy => non_empty(&filter.sort_by),
            Self::StartDate => non_empty(&filter.start_date),
            Self::EndDate => non_empty(&filter.end_date),
            Self::ItemType => non_empty(&filter.item_type),
            Self::Status => non_empty(&filter.status),
            Self::Categories => sorted_list(filter.categories.iter().cloned()),
            Self::OwnerId => filter
                .owner_id
                .filter(|id| !id.is_nil())
                .map(|id| id.to_string()),
            Self::Ids => sorted_list(filter.ids.iter().map(Uuid::to_string)),
        }
    }
}

fn parse_integer(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|err| err.to_string())
}

fn parse_identifier(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|err| err.to_string())
}

fn split_text_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

fn parse_identifier_list(raw: &str) -> Result<Vec<Uuid>, String> {
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            Uuid::parse_str(item).map_err(|err| format!("invalid identifier {item:?}: {err}"))
        })
        .collect()
}

fn non_zero(value: i64) -> Option<String> {
    (value != 0).then(|| value.to_string())
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn sorted_list(items: impl Iterator<Item = String>) -> Option<String> {
    let mut items: Vec<String> = items.collect();
    if items.is_empty() {
        return None;
    }
    items.sort();
    Some(items.join(","))
}
