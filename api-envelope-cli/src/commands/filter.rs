use std::path::Path;

use anyhow::{Context, Result};
use api_envelope::filter::{DynamicValue, FilterOptions};

use crate::utils;

pub fn execute(config: Option<&Path>, query: &str, max_limit: Option<i64>) -> Result<()> {
    let pagination = super::pagination_config(config, max_limit, None)?;
    let filter = FilterOptions::from_query(query, &pagination)?;

    println!("{}", render_filter(&filter)?);

    if !filter.dynamic_fields.is_empty() {
        utils::section("Dynamic fields");
        for line in render_dynamic_fields(&filter) {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Pretty JSON of the fixed attributes
pub fn render_filter(filter: &FilterOptions) -> Result<String> {
    serde_json::to_string_pretty(filter).context("Failed to encode filter as JSON")
}

/// One `name = value (kind)` line per dynamic field, ordered by name
pub fn render_dynamic_fields(filter: &FilterOptions) -> Vec<String> {
    let mut fields: Vec<_> = filter.dynamic_fields.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .map(|(name, value)| format!("{} = {} ({})", name, value, kind_label(value)))
        .collect()
}

fn kind_label(value: &DynamicValue) -> &'static str {
    match value {
        DynamicValue::Text(_) => "text",
        DynamicValue::Identifier(_) => "identifier",
        DynamicValue::TextList(_) => "text list",
        DynamicValue::IdentifierList(_) => "identifier list",
        DynamicValue::Integer(_) => "integer",
        DynamicValue::Boolean(_) => "boolean",
        DynamicValue::List(_) => "list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_envelope::config::PaginationConfig;

    #[test]
    fn test_render_filter_uses_external_names() {
        let filter =
            FilterOptions::from_query("q=%20term%20&type=invoice", &PaginationConfig::default())
                .unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_filter(&filter).unwrap()).unwrap();

        assert_eq!(json["q"], "term");
        assert_eq!(json["type"], "invoice");
        assert_eq!(json["limit"], 1);
    }

    #[test]
    fn test_render_dynamic_fields_sorted() {
        let filter = FilterOptions::from_query(
            "zone=b&zone=a&owner=123e4567-e89b-12d3-a456-426614174000&region=eu",
            &PaginationConfig::default(),
        )
        .unwrap();

        assert_eq!(
            render_dynamic_fields(&filter),
            vec![
                "owner = 123e4567-e89b-12d3-a456-426614174000 (identifier)",
                "region = eu (text)",
                "zone = a,b (text list)",
            ]
        );
    }
}
