//! Loosely-typed values for filter parameters unknown at compile time

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Value of a dynamic filter field
///
/// Raw query parameters only ever produce [`Text`](Self::Text),
/// [`Identifier`](Self::Identifier), [`TextList`](Self::TextList) and
/// [`IdentifierList`](Self::IdentifierList). The remaining variants exist for
/// filters assembled in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DynamicValue {
    /// Plain string
    Text(String),
    /// Parsed UUID
    Identifier(Uuid),
    /// Several strings, in input order
    TextList(Vec<String>),
    /// Several UUIDs, in input order
    IdentifierList(Vec<Uuid>),
    /// Integer
    Integer(i64),
    /// Boolean flag
    Boolean(bool),
    /// Heterogeneous sequence
    List(Vec<DynamicValue>),
}

impl DynamicValue {
    /// Interpret the raw values of one query parameter
    ///
    /// A single value becomes an identifier when it parses as a UUID, text
    /// otherwise. Several values become an identifier list only when every
    /// one of them parses; a single failure keeps all of them as text.
    /// Returns `None` when there are no values.
    ///
    /// ```rust
    /// use api_envelope::filter::DynamicValue;
    ///
    /// let value = DynamicValue::from_raw(&["123e4567-e89b-12d3-a456-426614174000".to_string()]);
    /// assert!(matches!(value, Some(DynamicValue::Identifier(_))));
    ///
    /// let value = DynamicValue::from_raw(&["a".to_string(), "b".to_string()]);
    /// assert_eq!(value, Some(DynamicValue::TextList(vec!["a".into(), "b".into()])));
    /// ```
    pub fn from_raw(values: &[String]) -> Option<Self> {
        match values {
            [] => None,
            [single] => Some(
                Uuid::parse_str(single)
                    .map(Self::Identifier)
                    .unwrap_or_else(|_| Self::Text(single.clone())),
            ),
            many => {
                let ids: Result<Vec<Uuid>, _> = many.iter().map(|v| Uuid::parse_str(v)).collect();
                Some(match ids {
                    Ok(ids) => Self::IdentifierList(ids),
                    Err(_) => Self::TextList(many.to_vec()),
                })
            }
        }
    }

    /// Order-independent string form used for cache keys
    ///
    /// Sequences are stringified element-wise, sorted, and comma-joined, so
    /// two lists holding the same elements in different orders agree.
    pub fn canonical(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Identifier(id) => id.to_string(),
            Self::TextList(items) => sorted_join(items.iter().cloned()),
            Self::IdentifierList(ids) => sorted_join(ids.iter().map(Uuid::to_string)),
            Self::Integer(n) => n.to_string(),
            Self::Boolean(flag) => flag.to_string(),
            Self::List(items) => sorted_join(items.iter().map(Self::canonical)),
        }
    }

    /// The identifier, if this is a single identifier
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Identifier(id) => Some(*id),
            _ => None,
        }
    }

    /// The identifiers, if this is an identifier list
    pub fn as_uuids(&self) -> Option<&[Uuid]> {
        match self {
            Self::IdentifierList(ids) => Some(ids),
            _ => None,
        }
    }

    /// The text, if this is a plain string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn sorted_join(items: impl Iterator<Item = String>) -> String {
    let mut items: Vec<String> = items.collect();
    items.sort();
    items.join(",")
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Uuid> for DynamicValue {
    fn from(value: Uuid) -> Self {
        Self::Identifier(value)
    }
}

impl From<Vec<String>> for DynamicValue {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}

impl From<Vec<&str>> for DynamicValue {
    fn from(value: Vec<&str>) -> Self {
        Self::TextList(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Uuid>> for DynamicValue {
    fn from(value: Vec<Uuid>) -> Self {
        Self::IdentifierList(value)
    }
}

impl From<i64> for DynamicValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for DynamicValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<DynamicValue>> for DynamicValue {
    fn from(value: Vec<DynamicValue>) -> Self {
        Self::List(value)
    }
}
