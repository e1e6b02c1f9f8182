//! Raw multi-valued query parameters and the filter parser

use std::collections::{BTreeMap, HashMap};

use super::dynamic::DynamicValue;
use super::fields::FixedField;
use super::options::FilterOptions;
use crate::config::PaginationConfig;
use crate::error::FieldConversionError;

/// Multi-valued, string-keyed request parameters
///
/// Values under one name keep their arrival order.
///
/// ```rust
/// use api_envelope::filter::QueryParams;
///
/// let params = QueryParams::from_query("tag=a&tag=b&q=hello%20world");
/// assert_eq!(params.get("q"), Some("hello world"));
/// assert_eq!(params.get_all("tag"), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` string
    ///
    /// A leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect()
    }

    /// Append a value under `name`
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// First value under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values under `name`, empty when missing
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter names with their values, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

impl From<HashMap<String, Vec<String>>> for QueryParams {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self {
            values: map
                .into_iter()
                .filter(|(_, values)| !values.is_empty())
                .collect(),
        }
    }
}

/// Build a validated filter from raw parameters
///
/// Fixed attributes take the first value of their parameter; a parameter
/// whose first value is empty is left unset. Every other parameter becomes a
/// dynamic field (see [`DynamicValue::from_raw`]). The result has already been
/// through [`FilterOptions::validate_with`].
///
/// # Errors
///
/// Fails on the first fixed attribute, in [`FixedField::ALL`] order, whose
/// value cannot be coerced. No partial filter is returned.
///
/// ```rust
/// use api_envelope::config::PaginationConfig;
/// use api_envelope::filter::{parse_parameters, QueryParams};
///
/// let params = QueryParams::from_query("page=abc");
/// let err = parse_parameters(&params, &PaginationConfig::default()).unwrap_err();
/// assert_eq!(err.field, "page");
/// ```
pub fn parse_parameters(
    params: &QueryParams,
    config: &PaginationConfig,
) -> Result<FilterOptions, FieldConversionError> {
    let mut filter = FilterOptions::new();
    let mut fixed = 0usize;

    for field in FixedField::ALL {
        let Some(raw) = params.get(field.param()).filter(|raw| !raw.is_empty()) else {
            continue;
        };
        if let Err(err) = field.assign(&mut filter, raw) {
            tracing::warn!(
                field = err.field,
                param = err.param,
                reason = %err.reason,
                "Rejecting filter parameter"
            );
            return Err(err);
        }
        fixed += 1;
    }

    for (name, values) in params.iter() {
        if FixedField::from_param(name).is_some() {
            continue;
        }
        if let Some(value) = DynamicValue::from_raw(values) {
            filter.dynamic_fields.insert(name.to_string(), value);
        }
    }

    filter.validate_with(config);

    tracing::debug!(
        fixed_fields = fixed,
        dynamic_fields = filter.dynamic_fields.len(),
        "Parsed filter parameters"
    );

    Ok(filter)
}

impl FilterOptions {
    /// Decode a raw query string and parse it into a validated filter
    pub fn from_query(query: &str, config: &PaginationConfig) -> Result<Self, FieldConversionError> {
        parse_parameters(&QueryParams::from_query(query), config)
    }
}
