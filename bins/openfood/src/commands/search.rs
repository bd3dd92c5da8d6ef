//! Search command - list products for one facet value

use super::{describe, field_set, header};
use anyhow::{Context, Result};
use openfood_api_client::{FacetKind, FacetQuery, OpenFoodClient};
use owo_colors::OwoColorize;

/// Run search command
pub async fn run(
    facet: FacetKind,
    value: &str,
    fields: Vec<String>,
    limit: usize,
    format: &str,
) -> Result<bool> {
    let client = OpenFoodClient::new().context("Failed to create API client")?;

    let query = FacetQuery {
        facet,
        value: value.to_string(),
        extra_fields: field_set(fields),
    };
    let result = client
        .facets()
        .search(&query)
        .await
        .with_context(|| format!("Search {facet}/{value} failed"))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(true);
    }

    header(&format!("{facet}: {value}"));

    if result.products.is_empty() {
        println!("  {}", "No products found".yellow());
        println!();
        return Ok(true);
    }

    println!(
        "  {} {} ({} returned)",
        result.count.to_string().green().bold(),
        "matching products".dimmed(),
        result.products.len()
    );
    println!();

    for product in result.products.iter().take(limit) {
        let code = product.code.as_deref().unwrap_or("-");
        println!("  {:<14} {}", code.dimmed(), describe(product));

        if let Some(extra) = &query.extra_fields {
            for field in extra {
                if matches!(field.as_str(), "code" | "product_name" | "brands" | "quantity") {
                    continue;
                }
                let value = product.field_text(field).unwrap_or_else(|| "-".to_string());
                println!("  {:<14} └─ {}: {}", "", field.dimmed(), value);
            }
        }
    }

    if result.products.len() > limit {
        println!();
        println!("  {}", format!("… {} more", result.products.len() - limit).dimmed());
    }
    println!();

    Ok(true)
}
