use std::path::Path;

use anyhow::Result;
use api_envelope::filter::{cache_key_segments, generate_cache_key, FilterOptions};

use crate::utils;

pub fn execute(
    config: Option<&Path>,
    query: &str,
    prefix: Option<String>,
    max_limit: Option<i64>,
    show_segments: bool,
) -> Result<()> {
    let pagination = super::pagination_config(config, max_limit, prefix)?;
    let filter = FilterOptions::from_query(query, &pagination)?;

    println!("{}", generate_cache_key(&filter, &pagination.cache_prefix));

    if show_segments {
        utils::section("Segments");
        for segment in cache_key_segments(&filter) {
            println!("  {}", segment);
        }
    }

    Ok(())
}
