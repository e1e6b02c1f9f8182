//! List filters: parsing, normalization and cache keys
//!
//! Raw query parameters flow through [`parse_parameters`] into a validated
//! [`FilterOptions`], which can then be fingerprinted with
//! [`generate_cache_key`].
//!
//! # Example
//!
//! ```rust
//! use api_envelope::config::PaginationConfig;
//! use api_envelope::filter::{FilterOptions, QueryParams, parse_parameters};
//!
//! let config = PaginationConfig::default().with_cache_prefix("users:");
//! let params = QueryParams::from_query("page=2&limit=10&categories=b,a&region=eu");
//! let filter = parse_parameters(&params, &config)?;
//!
//! assert_eq!(filter.offset, Some(10));
//! assert_eq!(filter.dynamic_field("region").and_then(|v| v.as_str()), Some("eu"));
//!
//! let key = filter.cache_key(&config.cache_prefix);
//! assert!(key.starts_with("users:list:"));
//!
//! let reordered = FilterOptions::from_query("region=eu&categories=a,b&limit=10&page=2", &config)?;
//! assert_eq!(key, reordered.cache_key(&config.cache_prefix));
//! # Ok::<(), api_envelope::error::FieldConversionError>(())
//! ```

mod cache_key;
mod dynamic;
mod extract;
mod fields;
mod options;
mod params;

pub use cache_key::{cache_key_segments, generate_cache_key, CACHE_KEY_NAMESPACE};
pub use dynamic::DynamicValue;
pub use extract::Filter;
pub use fields::{FieldKind, FixedField};
pub use options::{FilterOptions, SortDirection};
pub use params::{parse_parameters, QueryParams};
