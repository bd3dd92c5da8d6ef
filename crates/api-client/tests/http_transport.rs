use openfood_api_client::{
    ClientConfig, Credentials, FacetKind, FacetQuery, Lookup, OpenFoodClient, ProductSubmission,
    SubmissionFlow,
};
use std::collections::BTreeSet;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenFoodClient {
    let config = ClientConfig::development().with_base_url(server.uri());
    OpenFoodClient::with_config(config).unwrap()
}

// ── Facet search ────────────────────────────────────────────────

#[tokio::test]
async fn search_hits_facet_path_with_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/additive/e301-sodium-ascorbate.json"))
        .and(query_param("fields", "brands,product_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 2,
            "products": [
                {"brands": "b", "product_name": "second"},
                {"brands": "a", "product_name": "first"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = FacetQuery::new(FacetKind::Additive, "e301-sodium-ascorbate")
        .with_fields(["product_name", "brands"]);
    let result = client_for(&server).facets().search(&query).await.unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(result.products[0].product_name.as_deref(), Some("second"));
    assert_eq!(result.products[1].product_name.as_deref(), Some("first"));
}

#[tokio::test]
async fn search_without_fields_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/purchase-place/marseille-5.json"))
        .and(query_param_is_missing("fields"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"count":"0","products":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .facets()
        .by(FacetKind::PurchasePlace, "marseille-5")
        .await
        .unwrap();

    assert_eq!(result.count, 0);
    assert!(result.products.is_empty());
}

#[tokio::test]
async fn search_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/country/france.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .facets()
        .by(FacetKind::Country, "france")
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn search_html_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brand/monoprix.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .facets()
        .by(FacetKind::Brand, "monoprix")
        .await
        .unwrap_err();

    assert!(err.is_decode());
}

// ── Barcode lookup ──────────────────────────────────────────────

#[tokio::test]
async fn lookup_unknown_barcode_forwards_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v0/product/457457457.json"))
        .and(query_param("fields", "code"))
        .and(header("user-agent", "Test App - Search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 0,
            "status_verbose": "product not found",
            "code": "457457457"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields: BTreeSet<String> = ["code".to_string()].into();
    let state = client_for(&server)
        .products()
        .get_by_barcode("457457457", Some(&fields), "Test App - Search")
        .await
        .unwrap();

    assert_eq!(state.status, 0);
    assert_eq!(state.status_verbose, "product not found");
    assert_eq!(state.code, "457457457");
    assert!(matches!(state.lookup(), Lookup::NotFound { .. }));
}

// ── Submission ──────────────────────────────────────────────────

#[tokio::test]
async fn submit_then_verify_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi/product_jqm2.pl"))
        .and(header("authorization", "Basic b2ZmOm9mZg=="))
        .and(header("accept", "application/json"))
        .and(query_param("code", "1234567890"))
        .and(query_param("product_name", "ProductName"))
        .and(query_param("brands", "productbrand"))
        .and(query_param("quantity", "123 g"))
        .and(query_param("lang", "en"))
        .and(query_param("comment", "round trip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 1,
            "status_verbose": "fields saved"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v0/product/1234567890.json"))
        .and(query_param("fields", "brands,brands_tags,product_name,quantity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 1,
            "status_verbose": "product found",
            "code": "1234567890",
            "product": {
                "product_name": "ProductName",
                "brands": "productbrand",
                "brands_tags": ["productbrand"],
                "quantity": "123 g"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products = client.products();
    let auth = Credentials::basic("off", "off");
    let submission = ProductSubmission::new("1234567890")
        .with_lang("en")
        .with_name("ProductName")
        .with_brands("productbrand")
        .with_weight("123", "g");
    let sent = submission.to_fields();

    let result = products.submit_product(&submission, "round trip", &auth).await;
    let flow = SubmissionFlow::Unsubmitted.after_submit(&result);
    assert_eq!(flow, SubmissionFlow::Submitted);

    // lang is not part of the projection, so only check what came back
    let fields: BTreeSet<String> = ["product_name", "brands", "brands_tags", "quantity"]
        .map(String::from)
        .into();
    let state = products
        .get_by_barcode("1234567890", Some(&fields), client.user_agent())
        .await
        .unwrap();
    let mut checked = sent.clone();
    checked.remove("lang");

    assert_eq!(flow.after_fetch(&checked, &state), SubmissionFlow::Verified);
}

#[tokio::test]
async fn submit_unauthorized_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi/product_jqm2.pl"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .products()
        .submit_product(
            &ProductSubmission::new("1234567890").with_name("x"),
            "c",
            &Credentials::basic("nobody", "wrong"),
        )
        .await;

    assert!(result.as_ref().unwrap_err().is_client_error());
    assert!(matches!(
        SubmissionFlow::Unsubmitted.after_submit(&result),
        SubmissionFlow::Failed { .. }
    ));
}
