//! Response types shared by the endpoint clients
//!
//! Every product field is optional: a field the caller did not ask for is
//! `None`, a field the server returned empty is `Some("")`.

use crate::codec::{count_from_number_or_string, status_from_number_or_string};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `status_verbose` the server sends for a saved submission
pub const FIELDS_SAVED: &str = "fields saved";

/// A projection of product fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub code: Option<String>,
    pub product_name: Option<String>,
    pub brands: Option<String>,
    pub brands_tags: Option<Vec<String>>,
    pub quantity: Option<String>,
    pub lang: Option<String>,
    pub image_small_url: Option<String>,
    pub nutrition_grades_tags: Option<Vec<String>>,
    pub categories_tags: Option<Vec<String>>,
    pub labels_tags: Option<Vec<String>>,
    pub countries_tags: Option<Vec<String>>,
    /// Any other field the server returned
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ProductSummary {
    /// Look up a field by its server name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        fn string(v: &Option<String>) -> Option<Value> {
            v.as_ref().map(|s| Value::String(s.clone()))
        }
        fn tags(v: &Option<Vec<String>>) -> Option<Value> {
            v.as_ref()
                .map(|t| Value::Array(t.iter().cloned().map(Value::String).collect()))
        }

        match name {
            "code" => string(&self.code),
            "product_name" => string(&self.product_name),
            "brands" => string(&self.brands),
            "brands_tags" => tags(&self.brands_tags),
            "quantity" => string(&self.quantity),
            "lang" => string(&self.lang),
            "image_small_url" => string(&self.image_small_url),
            "nutrition_grades_tags" => tags(&self.nutrition_grades_tags),
            "categories_tags" => tags(&self.categories_tags),
            "labels_tags" => tags(&self.labels_tags),
            "countries_tags" => tags(&self.countries_tags),
            other => self.other.get(other).cloned(),
        }
    }

    /// Whether the server returned this field at all
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field rendered as text, for comparisons against submitted values
    #[must_use]
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Result of a facet search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches on the server
    #[serde(default, deserialize_with = "count_from_number_or_string")]
    pub count: u64,
    /// Products in server order
    #[serde(default)]
    pub products: Vec<ProductSummary>,
}

impl SearchResult {
    /// No product matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0 && self.products.is_empty()
    }

    /// `count == 0` exactly when `products` is empty
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        (self.count == 0) == self.products.is_empty()
    }
}

/// Result of a barcode lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductState {
    /// 1 when found, 0 otherwise
    #[serde(default, deserialize_with = "status_from_number_or_string")]
    pub status: i64,
    #[serde(default)]
    pub status_verbose: String,
    /// Requested barcode, exactly as the caller passed it
    #[serde(default)]
    pub code: String,
    /// Barcode as the server normalized it, when it differs from `code`
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub server_code: Option<String>,
    pub product: Option<ProductSummary>,
}

/// Found / not-found view of a [`ProductState`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Server knows the barcode
    Found(&'a ProductSummary),
    /// Server does not know the barcode
    NotFound {
        /// Server explanation, e.g. "product not found"
        reason: &'a str,
    },
}

impl ProductState {
    /// Branch on the lookup outcome
    #[must_use]
    pub fn lookup(&self) -> Lookup<'_> {
        match (&self.product, self.status) {
            (Some(product), 1) => Lookup::Found(product),
            _ => Lookup::NotFound {
                reason: &self.status_verbose,
            },
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self.lookup(), Lookup::Found(_))
    }
}

/// Result of a product submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default, deserialize_with = "status_from_number_or_string")]
    pub status: i64,
    #[serde(default)]
    pub status_verbose: String,
}

/// Saved / rejected view of a [`SubmissionResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission<'a> {
    /// `status == 1` and `"fields saved"`
    Saved,
    /// Anything else
    Rejected {
        /// Server explanation
        reason: &'a str,
    },
}

impl SubmissionResult {
    /// Branch on the submission outcome
    #[must_use]
    pub fn outcome(&self) -> Submission<'_> {
        if self.status == 1 && self.status_verbose == FIELDS_SAVED {
            Submission::Saved
        } else {
            Submission::Rejected {
                reason: &self.status_verbose,
            }
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.outcome() == Submission::Saved
    }
}
