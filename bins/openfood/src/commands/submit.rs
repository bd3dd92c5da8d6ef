//! Submit command - save product fields and optionally verify them

use super::header;
use anyhow::{Context, Result};
use openfood_api_client::{
    Credentials, OpenFoodClient, ProductSubmission, SubmissionFlow, TransportResult,
    SubmissionResult,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Arguments for the submit command
pub struct SubmitArgs {
    pub barcode: String,
    pub name: Option<String>,
    pub brands: Option<String>,
    pub weight: Option<String>,
    pub unit: Option<String>,
    pub lang: Option<String>,
    pub comment: Option<String>,
    pub verify: bool,
}

impl SubmitArgs {
    fn submission(&self) -> ProductSubmission {
        ProductSubmission {
            barcode: self.barcode.clone(),
            lang: self.lang.clone(),
            name: self.name.clone(),
            brands: self.brands.clone(),
            weight: self.weight.clone(),
            weight_unit: self.unit.clone(),
        }
    }
}

/// JSON output for submit
#[derive(Debug, Serialize)]
struct JsonSubmitOutput {
    barcode: String,
    status: Option<i64>,
    status_verbose: Option<String>,
    flow: SubmissionFlow,
}

/// Run submit command
///
/// Returns `false` unless the server saved the fields (and, with
/// `--verify`, echoed them back).
pub async fn run(args: SubmitArgs, format: &str) -> Result<bool> {
    let client = OpenFoodClient::new().context("Failed to create API client")?;
    let auth = Credentials::from_env().context("Credentials are required to submit")?;

    let submission = args.submission();
    let fields = submission.to_fields();
    let comment = args.comment.as_deref().unwrap_or(client.comment());
    let products = client.products();

    let result: TransportResult<SubmissionResult> =
        products.submit(&submission.barcode, &fields, comment, &auth).await;
    let mut flow = SubmissionFlow::Unsubmitted.after_submit(&result);
    debug!(?flow, "Submission finished");

    if args.verify && flow == SubmissionFlow::Submitted {
        let projection: BTreeSet<String> = fields
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| k.clone())
            .chain(
                fields
                    .get("brands")
                    .and_then(Option::as_ref)
                    .map(|_| "brands_tags".to_string()),
            )
            .collect();

        let state = products
            .get_by_barcode(&submission.barcode, Some(&projection), client.user_agent())
            .await
            .with_context(|| format!("Re-fetch of {} failed", submission.barcode))?;
        flow = flow.after_fetch(&fields, &state);
    }

    let ok = matches!(flow, SubmissionFlow::Submitted | SubmissionFlow::Verified);

    if format == "json" {
        let output = JsonSubmitOutput {
            barcode: submission.barcode.clone(),
            status: result.as_ref().ok().map(|r| r.status),
            status_verbose: result.as_ref().ok().map(|r| r.status_verbose.clone()),
            flow,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ok);
    }

    header(&format!("Submit {}", submission.barcode));

    for (field, value) in &fields {
        if let Some(value) = value {
            println!("  {:<14} {}", field.dimmed(), value);
        }
    }
    println!();

    match &flow {
        SubmissionFlow::Submitted => println!("  {} fields saved", "✓".green()),
        SubmissionFlow::Verified => {
            println!("  {} fields saved and verified", "✓".green());
        }
        SubmissionFlow::Failed { reason } => println!("  {} {}", "✗ Failed:".red(), reason),
        SubmissionFlow::Mismatched { mismatches } => {
            println!("  {} server returned different values", "✗ Mismatch:".red());
            for m in mismatches {
                println!(
                    "    └─ {:<14} expected {:?}, got {}",
                    m.field,
                    m.expected,
                    m.actual
                        .as_deref()
                        .map_or_else(|| "nothing".to_string(), |a| format!("{a:?}"))
                );
            }
        }
        SubmissionFlow::Unsubmitted => {}
    }
    println!();

    Ok(ok)
}
