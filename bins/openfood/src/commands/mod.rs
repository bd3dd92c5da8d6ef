//! CLI command implementations

pub mod facets;
pub mod product;
pub mod search;
pub mod submit;

use openfood_api_client::ProductSummary;
use owo_colors::OwoColorize;
use std::collections::BTreeSet;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print a boxed section title
pub(crate) fn header(title: &str) {
    println!();
    println!("{}", RULE.blue());
    println!("  {}", title.blue().bold());
    println!("{}", RULE.blue());
    println!();
}

/// Collect `--fields` values; an empty list means server defaults
pub(crate) fn field_set(fields: Vec<String>) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = fields
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

/// One-line description of a product
pub(crate) fn describe(product: &ProductSummary) -> String {
    let name = product.product_name.as_deref().filter(|n| !n.is_empty()).unwrap_or("(unnamed)");
    let mut line = name.to_string();
    if let Some(brands) = product.brands.as_deref().filter(|b| !b.is_empty()) {
        line.push_str(&format!(" · {brands}"));
    }
    if let Some(quantity) = product.quantity.as_deref().filter(|q| !q.is_empty()) {
        line.push_str(&format!(" · {quantity}"));
    }
    line
}
