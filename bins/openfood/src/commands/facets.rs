//! Facets command - list facet kinds and where they are served

use super::header;
use anyhow::Result;
use openfood_api_client::{EndpointShape, FacetKind};
use owo_colors::OwoColorize;

/// Run facets command
pub fn run(format: &str) -> Result<bool> {
    if format == "json" {
        let endpoints: Vec<_> = FacetKind::ALL.iter().map(|k| k.endpoint()).collect();
        println!("{}", serde_json::to_string_pretty(&endpoints)?);
        return Ok(true);
    }

    header("Facet Kinds");
    println!("  {:<18} {:<6} {}", "Facet".dimmed(), "Family".dimmed(), "Path".dimmed());
    println!("  {}", "─".repeat(52).dimmed());

    for kind in FacetKind::ALL {
        let endpoint = kind.endpoint();
        let family = match endpoint.shape {
            EndpointShape::Tag => "tag",
            EndpointShape::By => "by",
        };
        println!(
            "  {:<18} {:<6} {}/{}.json",
            kind.to_string().bold(),
            family,
            endpoint.segment,
            "<value>".dimmed()
        );
    }
    println!();

    Ok(true)
}
