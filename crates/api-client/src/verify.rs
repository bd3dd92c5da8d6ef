//! Round-trip verification of submissions
//!
//! The server is expected to echo every saved field on the next read.
//! Nothing in the clients checks that on its own; callers that care drive a
//! [`SubmissionFlow`] through submit and re-fetch.

use crate::error::TransportError;
use crate::types::{Lookup, ProductState, SubmissionResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// A submitted field that came back different
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    /// Server field name
    pub field: String,
    /// Value that was submitted
    pub expected: String,
    /// Value the server returned, `None` when the field was missing
    pub actual: Option<String>,
}

/// Outcome of comparing submitted fields with a re-fetched product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "mismatches", rename_all = "lowercase")]
pub enum Verification {
    Verified,
    Mismatched(Vec<FieldMismatch>),
}

impl Verification {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Compare submitted fields against a lookup result
///
/// `None` fields were not sent and are skipped. `brands` must also appear
/// in `brands_tags`.
#[must_use]
pub fn verify_round_trip(
    submitted: &BTreeMap<String, Option<String>>,
    fetched: &ProductState,
) -> Verification {
    let product = match fetched.lookup() {
        Lookup::Found(product) => product,
        Lookup::NotFound { reason } => {
            return Verification::Mismatched(vec![FieldMismatch {
                field: "status".to_string(),
                expected: "1".to_string(),
                actual: Some(format!("{} ({reason})", fetched.status)),
            }]);
        }
    };

    let mut mismatches = Vec::new();
    for (field, expected) in submitted {
        let Some(expected) = expected else { continue };

        let actual = product.field_text(field);
        if actual.as_deref() != Some(expected.as_str()) {
            mismatches.push(FieldMismatch {
                field: field.clone(),
                expected: expected.clone(),
                actual,
            });
        }

        if field == "brands" {
            let tagged = product
                .brands_tags
                .as_ref()
                .is_some_and(|tags| tags.iter().any(|t| t == expected));
            if !tagged {
                mismatches.push(FieldMismatch {
                    field: "brands_tags".to_string(),
                    expected: expected.clone(),
                    actual: product.field_text("brands_tags"),
                });
            }
        }
    }

    if mismatches.is_empty() {
        Verification::Verified
    } else {
        Verification::Mismatched(mismatches)
    }
}

/// Submission-then-verify state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SubmissionFlow {
    Unsubmitted,
    Submitted,
    Failed { reason: String },
    Verified,
    Mismatched { mismatches: Vec<FieldMismatch> },
}

impl SubmissionFlow {
    /// Advance from `Unsubmitted` with the submit outcome
    #[must_use]
    pub fn after_submit(self, result: &Result<SubmissionResult, TransportError>) -> Self {
        match (self, result) {
            (Self::Unsubmitted, Ok(r)) if r.is_saved() => Self::Submitted,
            (Self::Unsubmitted, Ok(r)) => Self::Failed {
                reason: format!("status {}: {}", r.status, r.status_verbose),
            },
            (Self::Unsubmitted, Err(e)) => Self::Failed {
                reason: e.to_string(),
            },
            (other, _) => other,
        }
    }

    /// Advance from `Submitted` with the re-fetched product
    #[must_use]
    pub fn after_fetch(
        self,
        submitted: &BTreeMap<String, Option<String>>,
        fetched: &ProductState,
    ) -> Self {
        match self {
            Self::Submitted => match verify_round_trip(submitted, fetched) {
                Verification::Verified => Self::Verified,
                Verification::Mismatched(mismatches) => Self::Mismatched { mismatches },
            },
            other => other,
        }
    }

    /// Terminal states: `Failed`, `Verified`, `Mismatched`
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Failed { .. } | Self::Verified | Self::Mismatched { .. }
        )
    }
}
