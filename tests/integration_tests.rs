//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → token grant → typed calls

use chrono::NaiveDate;
use moloni::resources::common::{ProductLine, TaxLine};
use moloni::resources::documents::DocumentSearch;
use moloni::resources::invoices::InvoiceInsert;
use moloni::{Error, MoloniClient, MoloniConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(server: &MockServer) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r"
base_url: {}
client_id: dev-id
client_secret: dev-secret
company_id: 5
auth:
  type: password
  username: me@example.com
  password: pw
http:
  max_retries: 3
  initial_backoff_ms: 1
  max_backoff_ms: 5
  requests_per_second: 0
",
        server.uri()
    )
    .unwrap();
    file
}

async fn mount_password_grant(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/grant/"))
        .and(query_param("grant_type", "password"))
        .and(query_param("client_id", "dev-id"))
        .and(query_param("username", "me@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "live-token",
            "expires_in": 3600,
            "token_type": "bearer",
            "refresh_token": "refresh"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn client_from_file(server: &MockServer) -> (MoloniClient, tempfile::NamedTempFile) {
    let file = write_config(server);
    let config = MoloniConfig::from_file(file.path()).unwrap();
    assert_eq!(config.company_id, Some(5));
    (MoloniClient::new(config).unwrap(), file)
}

fn invoice() -> InvoiceInsert {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut invoice = InvoiceInsert::new(5, date, date, 3, 42);

    let mut line = ProductLine::new(7, "Consulting", 2.0, 50.0);
    line.taxes.push(TaxLine::new(1));
    invoice.products.push(line);
    invoice
}

// ============================================================================
// Grant and dispatch
// ============================================================================

#[tokio::test]
async fn test_token_is_granted_once_and_reused() {
    let server = MockServer::start().await;
    mount_password_grant(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/count/"))
        .and(query_param("access_token", "live-token"))
        .and(body_partial_json(json!({"company_id": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": "12"})))
        .expect(2)
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);

    assert_eq!(client.customers().count(5).await.unwrap(), 12);
    assert_eq!(client.customers().count(5).await.unwrap(), 12);
}

#[tokio::test]
async fn test_invoice_insert_round_trip() {
    let server = MockServer::start().await;
    mount_password_grant(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/invoices/insert/"))
        .and(body_partial_json(json!({
            "company_id": 5,
            "date": "2024-01-15",
            "document_set_id": 3,
            "customer_id": 42,
            "products": [{"product_id": 7, "qty": 2.0, "price": 50.0, "taxes": [{"tax_id": 1}]}]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"valid": 1, "document_id": 991})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/invoices/getOne/"))
        .and(body_partial_json(json!({"document_id": 991})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "document_id": "991",
            "number": 17,
            "date": "2024-01-15T00:00:00+0000",
            "status": 1,
            "net_value": "123.00",
            "products": [{"product_id": 7, "name": "Consulting", "qty": "2", "price": "50"}]
        })))
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);

    let document_id = client.invoices().insert(&invoice()).await.unwrap();
    assert_eq!(document_id, 991);

    let document = client
        .invoices()
        .get_one(5, document_id)
        .await
        .unwrap()
        .unwrap();
    assert!(document.is_closed());
    assert_eq!(document.products.len(), 1);
    assert_eq!(document.products[0].qty, 2.0);
}

#[tokio::test]
async fn test_invalid_invoice_is_rejected_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);

    let mut untaxed = invoice();
    untaxed.products[0].taxes.clear();
    let err = client.invoices().insert(&untaxed).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("exemption_reason"));

    let mut empty = invoice();
    empty.products.clear();
    assert!(client.invoices().insert(&empty).await.unwrap_err().is_validation());
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_rejected_grant_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/grant/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid username and password combination"
        })))
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);
    let err = client.companies().get_all().await.unwrap_err();
    assert!(
        matches!(err, Error::Auth { .. } | Error::Api { .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("invalid"));
}

#[tokio::test]
async fn test_valid_zero_on_update_surfaces_descriptions() {
    let server = MockServer::start().await;
    mount_password_grant(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/invoices/delete/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": 0,
            "errors": [{"code": "1 document_id", "description": "Closed documents cannot be deleted"}]
        })))
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);
    let err = client.invoices().delete(5, 991).await.unwrap_err();

    let errors = err.api_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].description, "Closed documents cannot be deleted");
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    mount_password_grant(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tax_id": 1, "name": "IVA 23%", "value": "23", "type": 1}
        ])))
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);
    let taxes = client.taxes().get_all(5).await.unwrap();
    assert_eq!(taxes[0].name, "IVA 23%");
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_invoice_pages_until_short_page() {
    let server = MockServer::start().await;
    mount_password_grant(&server).await;

    let page = |start: u64, n: u64| {
        (start..start + n)
            .map(|id| json!({"document_id": id, "number": id}))
            .collect::<Vec<_>>()
    };

    Mock::given(method("POST"))
        .and(path("/v1/invoices/getAll/"))
        .and(body_partial_json(json!({"qty": 50, "offset": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 50)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/invoices/getAll/"))
        .and(body_partial_json(json!({"qty": 50, "offset": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(51, 7)))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _file) = client_from_file(&server);
    let documents = client
        .invoices()
        .get_all_pages(&DocumentSearch::new(5))
        .await
        .unwrap();

    assert_eq!(documents.len(), 57);
    assert_eq!(documents.last().unwrap().document_id, 57);
}
