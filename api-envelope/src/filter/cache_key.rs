//! Deterministic cache keys for list filters
//!
//! The key only depends on filter content. Elements inside list values are
//! sorted, then every `name:value` segment is sorted, so neither input order
//! nor map iteration order can change it.

use sha2::{Digest, Sha256};

use super::fields::FixedField;
use super::options::FilterOptions;

/// Marker between the caller's prefix and the digest
pub const CACHE_KEY_NAMESPACE: &str = "list:";

/// The sorted `name:value` segments that feed the digest
///
/// Fixed attributes use their external parameter names. Absent values and
/// dynamic fields whose canonical form is empty are left out.
pub fn cache_key_segments(filter: &FilterOptions) -> Vec<String> {
    let fixed = FixedField::ALL.iter().filter_map(|field| {
        field
            .canonical(filter)
            .map(|value| format!("{}:{}", field.param(), value))
    });

    let dynamic = filter.dynamic_fields.iter().filter_map(|(name, value)| {
        let value = value.canonical();
        (!value.is_empty()).then(|| format!("{name}:{value}"))
    });

    let mut segments: Vec<String> = fixed.chain(dynamic).collect();
    segments.sort();
    segments
}

/// Build the cache key for `filter`
///
/// The result is `prefix` followed by `list:` and the hex SHA-256 of the
/// colon-joined segments from [`cache_key_segments`].
///
/// ```rust
/// use api_envelope::filter::{generate_cache_key, FilterOptions};
///
/// let a = FilterOptions::new().with_categories(["b", "a"]);
/// let b = FilterOptions::new().with_categories(["a", "b"]);
///
/// let key = generate_cache_key(&a, "users:");
/// assert!(key.starts_with("users:list:"));
/// assert_eq!(key, generate_cache_key(&b, "users:"));
/// ```
pub fn generate_cache_key(filter: &FilterOptions, prefix: &str) -> String {
    let segments = cache_key_segments(filter);
    let digest = Sha256::digest(segments.join(":").as_bytes());

    tracing::debug!(segments = segments.len(), "Generated cache key");

    format!("{prefix}{CACHE_KEY_NAMESPACE}{}", hex::encode(digest))
}

impl FilterOptions {
    /// Shorthand for [`generate_cache_key`]
    pub fn cache_key(&self, prefix: &str) -> String {
        generate_cache_key(self, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaginationConfig;
    use crate::filter::{DynamicValue, SortDirection};
    use proptest::prelude::*;
    use uuid::Uuid;

    const ID_A: &str = "123e4567-e89b-12d3-a456-426614174000";
    const ID_B: &str = "987fcdeb-51a2-43d7-9012-345678901234";

    fn sha256_hex(input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }

    #[test]
    fn test_empty_filter_hashes_empty_string() {
        let key = generate_cache_key(&FilterOptions::new(), "");
        assert_eq!(key, format!("list:{}", sha256_hex("")));
        assert_eq!(
            key,
            "list:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_segments_are_sorted_across_fixed_and_dynamic() {
        let filter = FilterOptions::new()
            .with_page(2)
            .with_limit(10)
            .with_search("abc")
            .with_dynamic_field("b_field", "x")
            .with_dynamic_field("a_field", "y");

        assert_eq!(
            cache_key_segments(&filter),
            vec!["a_field:y", "b_field:x", "limit:10", "page:2", "q:abc"]
        );
        assert_eq!(
            generate_cache_key(&filter, "p:"),
            format!("p:list:{}", sha256_hex("a_field:y:b_field:x:limit:10:page:2:q:abc"))
        );
    }

    #[test]
    fn test_validated_filter_segments() {
        let filter = FilterOptions::new()
            .with_page(2)
            .with_limit(10)
            .validated(100);
        assert_eq!(
            cache_key_segments(&filter),
            vec!["limit:10", "offset:10", "page:2", "sort:DESC"]
        );
    }

    #[test]
    fn test_zero_integers_are_absent() {
        let unset = FilterOptions::new();
        let zero = FilterOptions::new().with_page(0).with_limit(0);
        assert_eq!(unset.cache_key(""), zero.cache_key(""));
    }

    #[test]
    fn test_explicit_zero_offset_is_present() {
        let unset = FilterOptions::new();
        let zero = FilterOptions::new().with_offset(0);
        assert_ne!(unset.cache_key(""), zero.cache_key(""));
        assert_eq!(cache_key_segments(&zero), vec!["offset:0"]);
    }

    #[test]
    fn test_category_order_does_not_matter() {
        let a = FilterOptions::new().with_categories(["b", "a"]);
        let b = FilterOptions::new().with_categories(["a", "b"]);
        assert_eq!(a.cache_key("x:"), b.cache_key("x:"));
        assert_eq!(cache_key_segments(&a), vec!["categories:a,b"]);
    }

    #[test]
    fn test_identifier_list_order_does_not_matter() {
        let a = Uuid::parse_str(ID_A).unwrap();
        let b = Uuid::parse_str(ID_B).unwrap();
        let one = FilterOptions {
            ids: vec![a, b],
            ..FilterOptions::default()
        }
        .with_dynamic_field("users", vec![b, a]);
        let two = FilterOptions {
            ids: vec![b, a],
            ..FilterOptions::default()
        }
        .with_dynamic_field("users", vec![a, b]);

        assert_eq!(one.cache_key(""), two.cache_key(""));
    }

    #[test]
    fn test_dynamic_zero_integer_is_present() {
        let filter = FilterOptions::new().with_dynamic_field("x", 0i64);
        assert_eq!(cache_key_segments(&filter), vec!["x:0"]);
    }

    #[test]
    fn test_empty_dynamic_values_are_omitted() {
        let filter = FilterOptions::new()
            .with_dynamic_field("blank", "")
            .with_dynamic_field("none", DynamicValue::TextList(Vec::new()));
        assert!(cache_key_segments(&filter).is_empty());
    }

    #[test]
    fn test_prefix_changes_only_the_prefix() {
        let filter = FilterOptions::new().with_sort("name", SortDirection::Asc);
        let plain = filter.cache_key("");
        let prefixed = filter.cache_key("orders:");
        assert_eq!(format!("orders:{plain}"), prefixed);
    }

    #[test]
    fn test_different_filters_differ() {
        let config = PaginationConfig::default();
        let a = FilterOptions::from_query("page=1&limit=10", &config).unwrap();
        let b = FilterOptions::from_query("page=2&limit=10", &config).unwrap();
        assert_ne!(a.cache_key(""), b.cache_key(""));
    }

    proptest! {
        #[test]
        fn prop_dynamic_insertion_order_is_irrelevant(
            entries in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..8)
        ) {
            let forward = entries
                .iter()
                .fold(FilterOptions::new(), |f, (k, v)| f.with_dynamic_field(k.as_str(), v.as_str()));
            let backward = entries
                .iter()
                .rev()
                .fold(FilterOptions::new(), |f, (k, v)| f.with_dynamic_field(k.as_str(), v.as_str()));

            prop_assert_eq!(forward.cache_key("k:"), backward.cache_key("k:"));
        }

        #[test]
        fn prop_list_order_is_irrelevant(
            mut categories in proptest::collection::vec("[a-z]{1,5}", 0..6),
            mut tags in proptest::collection::vec("[a-z]{1,5}", 0..6),
        ) {
            let first = FilterOptions::new()
                .with_categories(categories.clone())
                .with_dynamic_field("tags", tags.clone());
            categories.reverse();
            tags.reverse();
            let second = FilterOptions::new()
                .with_categories(categories)
                .with_dynamic_field("tags", tags);

            prop_assert_eq!(generate_cache_key(&first, ""), generate_cache_key(&second, ""));
        }

        #[test]
        fn prop_key_is_deterministic(page in 0i64..50, limit in 0i64..200, q in "[a-z ]{0,10}") {
            let filter = FilterOptions::new().with_page(page).with_limit(limit).with_search(q);
            let key = filter.cache_key("");
            prop_assert_eq!(&key, &filter.clone().cache_key(""));
            prop_assert_eq!(key.len(), "list:".len() + 64);
        }
    }
}
