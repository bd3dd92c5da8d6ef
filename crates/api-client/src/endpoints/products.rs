//! Product endpoints
//!
//! - Get a single product by barcode (`api/v0/product/<barcode>.json`)
//! - Save product fields (`cgi/product_jqm2.pl`, authenticated)
//!
//! An unknown barcode and a declined write are answers, not errors; see
//! [`ProductState::lookup`] and [`SubmissionResult::outcome`].

use crate::auth::Credentials;
use crate::codec::decode;
use crate::endpoints::facets::join_fields;
use crate::error::TransportResult;
use crate::transport::{Transport, TransportRequest};
use crate::types::{ProductState, SubmissionResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const PRODUCT_PATH: [&str; 3] = ["api", "v0", "product"];
const SAVE_PATH: [&str; 2] = ["cgi", "product_jqm2.pl"];

/// Query keys set from `submit` arguments, never from the field map
const RESERVED_FIELDS: [&str; 2] = ["code", "comment"];

/// Product API interface
#[derive(Clone)]
pub struct ProductClient {
    transport: Arc<dyn Transport>,
}

impl ProductClient {
    /// Create a product client over a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Get a single product by barcode
    ///
    /// GET /api/v0/product/`<barcode>`.json[?fields=...]
    ///
    /// `user_agent_tag` is sent as the `User-Agent` header unchanged.
    #[instrument(skip(self, fields, user_agent_tag))]
    pub async fn get_by_barcode(
        &self,
        barcode: &str,
        fields: Option<&BTreeSet<String>>,
        user_agent_tag: &str,
    ) -> TransportResult<ProductState> {
        let body = self
            .transport
            .execute(lookup_request(barcode, fields, user_agent_tag))
            .await?;
        let mut state: ProductState = decode(&body)?;

        if !state.code.is_empty() && state.code != barcode {
            state.server_code = Some(std::mem::take(&mut state.code));
        }
        state.code = barcode.to_string();

        debug!(
            status = state.status,
            status_verbose = %state.status_verbose,
            found = state.is_found(),
            "Barcode lookup completed"
        );
        Ok(state)
    }

    /// Save product fields
    ///
    /// POST /cgi/product_jqm2.pl?code=`<barcode>`&...&comment=...
    ///
    /// Fields whose value is `None` are left out of the request so the
    /// server keeps what it has.
    #[instrument(skip(self, fields, comment, auth), fields(field_count = fields.len()))]
    pub async fn submit(
        &self,
        barcode: &str,
        fields: &BTreeMap<String, Option<String>>,
        comment: &str,
        auth: &Credentials,
    ) -> TransportResult<SubmissionResult> {
        let body = self
            .transport
            .execute(submit_request(barcode, fields, comment, auth))
            .await?;
        let result: SubmissionResult = decode(&body)?;

        if result.is_saved() {
            debug!("Submission saved");
        } else {
            warn!(
                status = result.status,
                status_verbose = %result.status_verbose,
                "Submission rejected"
            );
        }
        Ok(result)
    }

    /// Save a [`ProductSubmission`]
    pub async fn submit_product(
        &self,
        product: &ProductSubmission,
        comment: &str,
        auth: &Credentials,
    ) -> TransportResult<SubmissionResult> {
        self.submit(&product.barcode, &product.to_fields(), comment, auth)
            .await
    }
}

fn lookup_request(
    barcode: &str,
    fields: Option<&BTreeSet<String>>,
    user_agent_tag: &str,
) -> TransportRequest {
    let mut path: Vec<String> = PRODUCT_PATH.iter().map(ToString::to_string).collect();
    path.push(format!("{barcode}.json"));

    let request = TransportRequest::get(path).with_header("User-Agent", user_agent_tag);
    match join_fields(fields) {
        Some(fields) => request.with_query("fields", fields),
        None => request,
    }
}

fn submit_request(
    barcode: &str,
    fields: &BTreeMap<String, Option<String>>,
    comment: &str,
    auth: &Credentials,
) -> TransportRequest {
    let mut request = TransportRequest::post(SAVE_PATH)
        .with_query("code", barcode)
        .with_credentials(auth);

    for (name, value) in fields {
        if RESERVED_FIELDS.contains(&name.as_str()) {
            warn!(field = %name, "Ignoring reserved submission field");
            continue;
        }
        if let Some(value) = value {
            request = request.with_query(name.as_str(), value.as_str());
        }
    }

    request.with_query("comment", comment)
}

// ============================================================================
// Request Types
// ============================================================================

/// Product fields to save, in the shape a user enters them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSubmission {
    pub barcode: String,
    pub lang: Option<String>,
    pub name: Option<String>,
    pub brands: Option<String>,
    /// Net weight, without unit
    pub weight: Option<String>,
    /// Unit for `weight`, e.g. `g`
    pub weight_unit: Option<String>,
}

impl ProductSubmission {
    /// Start a submission for a barcode
    pub fn new(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            ..Self::default()
        }
    }

    /// Set the product language
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Set the product name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the brands
    #[must_use]
    pub fn with_brands(mut self, brands: impl Into<String>) -> Self {
        self.brands = Some(brands.into());
        self
    }

    /// Set weight and unit
    #[must_use]
    pub fn with_weight(mut self, weight: impl Into<String>, unit: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self.weight_unit = Some(unit.into());
        self
    }

    /// `"<weight> <unit>"`, or the bare weight when no unit is set
    ///
    /// An empty weight counts as unset.
    #[must_use]
    pub fn quantity(&self) -> Option<String> {
        let weight = self.weight.as_deref().filter(|w| !w.is_empty())?;
        match self.weight_unit.as_deref() {
            Some(unit) if !unit.is_empty() => Some(format!("{weight} {unit}")),
            _ => Some(weight.to_string()),
        }
    }

    /// Server field names mapped to values; unset values are `None`
    #[must_use]
    pub fn to_fields(&self) -> BTreeMap<String, Option<String>> {
        BTreeMap::from([
            ("lang".to_string(), self.lang.clone()),
            ("product_name".to_string(), self.name.clone()),
            ("brands".to_string(), self.brands.clone()),
            ("quantity".to_string(), self.quantity()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::testing::MockTransport;
    use crate::types::{Lookup, Submission};
    use reqwest::Method;

    fn sample() -> ProductSubmission {
        ProductSubmission::new("1234567890")
            .with_lang("en")
            .with_name("ProductName")
            .with_brands("productbrand")
            .with_weight("123", "g")
    }

    #[test]
    fn test_quantity_composition() {
        assert_eq!(sample().quantity().as_deref(), Some("123 g"));
        let bare = ProductSubmission {
            weight: Some("500".to_string()),
            ..ProductSubmission::new("1")
        };
        assert_eq!(bare.quantity().as_deref(), Some("500"));
        assert_eq!(ProductSubmission::new("1").quantity(), None);
    }

    #[test]
    fn test_empty_weight_has_no_quantity() {
        let empty = ProductSubmission::new("1").with_weight("", "g");
        assert_eq!(empty.quantity(), None);
        assert_eq!(empty.to_fields()["quantity"], None);
    }

    #[test]
    fn test_to_fields() {
        let fields = sample().to_fields();
        assert_eq!(fields["lang"].as_deref(), Some("en"));
        assert_eq!(fields["product_name"].as_deref(), Some("ProductName"));
        assert_eq!(fields["brands"].as_deref(), Some("productbrand"));
        assert_eq!(fields["quantity"].as_deref(), Some("123 g"));
    }

    #[test]
    fn test_lookup_request_shape() {
        let fields: BTreeSet<String> = ["product_name", "brands"].map(String::from).into();
        let request = lookup_request("457457457", Some(&fields), "my-app/1.0 search");

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path_string(), "api/v0/product/457457457.json");
        assert_eq!(request.query_value("fields"), Some("brands,product_name"));
        assert_eq!(request.header_value("user-agent"), Some("my-app/1.0 search"));
    }

    #[test]
    fn test_submit_request_omits_none() {
        let fields = BTreeMap::from([
            ("product_name".to_string(), Some("ProductName".to_string())),
            ("brands".to_string(), None),
            ("quantity".to_string(), Some(String::new())),
        ]);
        let request = submit_request("1234567890", &fields, "test", &Credentials::basic("off", "off"));

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path_string(), "cgi/product_jqm2.pl");
        assert_eq!(request.query_value("code"), Some("1234567890"));
        assert_eq!(request.query_value("product_name"), Some("ProductName"));
        assert_eq!(request.query_value("brands"), None);
        assert_eq!(request.query_value("quantity"), Some(""));
        assert_eq!(request.query_value("comment"), Some("test"));
        assert_eq!(request.header_value("Authorization"), Some("Basic b2ZmOm9mZg=="));
        assert_eq!(request.header_value("Accept"), Some("application/json"));
    }

    #[test]
    fn test_submit_request_ignores_reserved_fields() {
        let fields = BTreeMap::from([
            ("code".to_string(), Some("999".to_string())),
            ("comment".to_string(), Some("x".to_string())),
            ("brands".to_string(), Some("productbrand".to_string())),
        ]);
        let request = submit_request("1234567890", &fields, "real", &Credentials::from_token("t"));

        let keys: Vec<_> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["code", "brands", "comment"]);
        assert_eq!(request.query_value("code"), Some("1234567890"));
        assert_eq!(request.query_value("comment"), Some("real"));
    }

    #[tokio::test]
    async fn test_unknown_barcode_is_not_an_error() {
        let mock = Arc::new(MockTransport::json(
            r#"{"status": 0, "status_verbose": "product not found", "code": "457457457"}"#,
        ));
        let client = ProductClient::new(mock);

        let fields: BTreeSet<String> = ["code".to_string()].into();
        let state = client
            .get_by_barcode("457457457", Some(&fields), "tests")
            .await
            .unwrap();

        assert_eq!(state.status, 0);
        assert_eq!(state.status_verbose, "product not found");
        assert_eq!(state.code, "457457457");
        assert!(state.product.is_none());
    }

    #[tokio::test]
    async fn test_code_echoed_when_server_omits_it() {
        let mock = Arc::new(MockTransport::json(r#"{"status": 0, "status_verbose": "no code"}"#));
        let client = ProductClient::new(mock);

        let state = client.get_by_barcode("0000", None, "tests").await.unwrap();
        assert_eq!(state.code, "0000");
        assert_eq!(state.server_code, None);
    }

    #[tokio::test]
    async fn test_code_echoes_request_when_server_normalizes_it() {
        let mock = Arc::new(MockTransport::json(
            r#"{"status": 0, "status_verbose": "product not found", "code": "0457457457000"}"#,
        ));
        let client = ProductClient::new(mock);

        let state = client.get_by_barcode("457457457000", None, "tests").await.unwrap();
        assert_eq!(state.code, "457457457000");
        assert_eq!(state.server_code.as_deref(), Some("0457457457000"));
    }

    #[tokio::test]
    async fn test_found_barcode() {
        let mock = Arc::new(MockTransport::json(
            r#"{"status": 1, "status_verbose": "product found", "code": "1234567890",
                "product": {"product_name": "ProductName", "brands": "productbrand",
                            "brands_tags": ["productbrand"], "quantity": "123 g"}}"#,
        ));
        let client = ProductClient::new(mock.clone());

        let state = client.get_by_barcode("1234567890", None, "tests").await.unwrap();
        let Lookup::Found(product) = state.lookup() else {
            panic!("expected a product");
        };
        assert_eq!(product.quantity.as_deref(), Some("123 g"));
        assert!(mock.last_request().query.is_empty());
    }

    #[tokio::test]
    async fn test_submit_saved() {
        let mock = Arc::new(MockTransport::json(r#"{"status": 1, "status_verbose": "fields saved"}"#));
        let client = ProductClient::new(mock.clone());

        let result = client
            .submit_product(&sample(), "integration test", &Credentials::basic("off", "off"))
            .await
            .unwrap();

        assert_eq!(result.outcome(), Submission::Saved);
        let request = mock.last_request();
        assert_eq!(request.query_value("quantity"), Some("123 g"));
        assert_eq!(request.query_value("lang"), Some("en"));
    }

    #[tokio::test]
    async fn test_submit_rejected_is_data() {
        let mock = Arc::new(MockTransport::json(
            r#"{"status": 0, "status_verbose": "no code or invalid code"}"#,
        ));
        let client = ProductClient::new(mock);

        let result = client
            .submit("", &BTreeMap::new(), "c", &Credentials::from_token("x"))
            .await
            .unwrap();
        assert!(!result.is_saved());
    }

    #[tokio::test]
    async fn test_submit_transport_failure() {
        let mock = Arc::new(MockTransport::failing(TransportError::status(401, "unauthorized")));
        let client = ProductClient::new(mock);

        let err = client
            .submit_product(&sample(), "c", &Credentials::from_token("bad"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
