//! Product command - look up one barcode

use super::{describe, field_set, header};
use anyhow::{Context, Result};
use openfood_api_client::{Lookup, OpenFoodClient};
use owo_colors::OwoColorize;

/// Run product command
///
/// Returns `false` when the barcode is unknown.
pub async fn run(
    barcode: &str,
    fields: Vec<String>,
    user_agent: Option<&str>,
    format: &str,
) -> Result<bool> {
    let client = OpenFoodClient::new().context("Failed to create API client")?;
    let fields = field_set(fields);
    let user_agent = user_agent.unwrap_or(client.user_agent());

    let state = client
        .products()
        .get_by_barcode(barcode, fields.as_ref(), user_agent)
        .await
        .with_context(|| format!("Lookup of {barcode} failed"))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(state.is_found());
    }

    header(&format!("Product {}", state.code));

    match state.lookup() {
        Lookup::Found(product) => {
            println!("  {} {}", "✓".green(), describe(product));
            if let Some(fields) = &fields {
                for field in fields {
                    let value = product.field_text(field).unwrap_or_else(|| "-".to_string());
                    println!("    └─ {:<22} {}", field.dimmed(), value);
                }
            }
            println!();
            Ok(true)
        }
        Lookup::NotFound { reason } => {
            println!("  {} {}", "✗".red(), reason);
            println!();
            Ok(false)
        }
    }
}
