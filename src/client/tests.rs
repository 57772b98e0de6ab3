//! Tests for request dispatch

use super::*;
use crate::config::{AuthGrant, HttpSettings};
use crate::error::ApiErrorDetail;
use crate::pagination::Page;
use crate::resources::common::{CompanyListModel, CompanyScope};
use crate::resources::{customers, taxes};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_http() -> HttpSettings {
    HttpSettings {
        max_retries: 1,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
        requests_per_second: 0,
        ..HttpSettings::default()
    }
}

fn static_token_config(server: &MockServer) -> MoloniConfig {
    MoloniConfig {
        base_url: server.uri(),
        auth: AuthGrant::AccessToken {
            access_token: "tok".to_string(),
        },
        http: fast_http(),
        ..MoloniConfig::default()
    }
}

fn client_for(server: &MockServer) -> MoloniClient {
    MoloniClient::new(static_token_config(server)).unwrap()
}

#[tokio::test]
async fn test_call_posts_json_with_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .and(query_param("access_token", "tok"))
        .and(query_param("json", "true"))
        .and(query_param("human_errors", "true"))
        .and(body_json(json!({"company_id": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tax_id": 1, "name": "IVA 23%", "value": "23"},
            {"tax_id": "2", "name": "IVA 6%", "value": 6}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let taxes: Vec<taxes::Tax> = client
        .call(taxes::GET_ALL, &CompanyScope::new(5))
        .await
        .unwrap();

    assert_eq!(taxes.len(), 2);
    assert_eq!(taxes[1].tax_id, 2);
    assert_eq!(taxes[1].value, Some(6.0));
}

#[tokio::test]
async fn test_human_errors_can_be_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/companies/getAll/"))
        .and(query_param_is_missing("human_errors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = static_token_config(&server);
    config.human_errors = false;
    let client = MoloniClient::new(config).unwrap();

    assert!(client.companies().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_api_version() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = static_token_config(&server);
    config.api_version = "v2".to_string();
    let client = MoloniClient::new(config).unwrap();

    assert_eq!(
        client.endpoint_path(taxes::GET_ALL).unwrap(),
        "v2/taxes/getAll/"
    );
    assert!(client.taxes().get_all(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_never_reaches_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.taxes().get_all(0).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Invalid CompanyScope.company_id: is required"
    );
}

#[tokio::test]
async fn test_valid_zero_envelope_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/insert/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": 0,
            "errors": [{"code": "5 vat", "description": "VAT already in use"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let customer = customers::CustomerInsert {
        company_id: 5,
        vat: "999999990".into(),
        number: "C1".into(),
        name: "Maria".into(),
        language_id: 1,
        address: "Rua".into(),
        city: "Porto".into(),
        country_id: 1,
        maturity_date_id: 1,
        payment_method_id: 1,
        ..customers::CustomerInsert::default()
    };
    let err = client.customers().insert(&customer).await.unwrap_err();

    match err {
        Error::Api { endpoint, errors } => {
            assert_eq!(endpoint, "customers/insert");
            assert_eq!(errors, vec![ApiErrorDetail::new("5 vat", "VAT already in use")]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_array_envelope_on_4xx() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            {"code": "1 company_id", "description": "Company not found"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.taxes().get_all(77).await.unwrap_err();
    assert!(err.is_api());
    assert_eq!(err.api_errors()[0].code, "1 company_id");
}

#[tokio::test]
async fn test_plain_http_error_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.taxes().get_all(1).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_insert_not_resent_after_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": 1, "tax_id": 9})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .call_raw(taxes::INSERT, json!({"company_id": 5, "name": "IVA", "value": 23}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_read_resent_after_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.taxes().get_all(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.taxes().get_all(1).await.unwrap_err();
    match err {
        Error::Decode { endpoint, .. } => assert_eq!(endpoint, "taxes/getAll"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_call_optional_maps_empty_bodies_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/getOne/"))
        .and(body_json(json!({"company_id": 5, "customer_id": 404})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/customers/getOne/"))
        .and(body_json(json!({"company_id": 5, "customer_id": 42})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"customer_id": 42, "name": "Maria", "number": "C1"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.customers().get_one(5, 404).await.unwrap(), None);

    let customer = client.customers().get_one(5, 42).await.unwrap().unwrap();
    assert_eq!(customer.name, "Maria");
}

#[tokio::test]
async fn test_count_mutate_delete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/count/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": "12"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"valid": 1, "tax_id": 88})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/taxes/delete/"))
        .and(body_json(json!({"company_id": 5, "tax_id": 88})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": 1})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.customers().count(5).await.unwrap(), 12);

    let tax = taxes::TaxInsert::vat(5, "IVA 13%", 13.0, "PT");
    assert_eq!(client.taxes().insert(&tax).await.unwrap(), 88);

    client.taxes().delete(5, 88).await.unwrap();
}

#[tokio::test]
async fn test_fetch_all_walks_pages() {
    let server = MockServer::start().await;

    for (offset, ids) in [(0u32, vec![1, 2]), (2, vec![3, 4]), (4, vec![5])] {
        let body: Vec<_> = ids
            .iter()
            .map(|id| json!({"customer_id": id, "name": format!("C{id}")}))
            .collect();
        Mock::given(method("POST"))
            .and(path("/v1/customers/getAll/"))
            .and(body_json(json!({"company_id": 5, "qty": 2, "offset": offset})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let request = CompanyListModel::new(5).with_page(Page::first(2));
    let all: Vec<customers::Customer> = client
        .fetch_all(customers::GET_ALL, &request)
        .await
        .unwrap();

    let ids: Vec<Id> = all.iter().map(|c| c.customer_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_fetch_pages_respects_record_cap() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/getAll/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"customer_id": 1}, {"customer_id": 2}, {"customer_id": 3}
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let pager = OffsetPager::new(3).with_max_records(4);
    let records: Vec<customers::Customer> = client
        .fetch_pages(customers::GET_ALL, &CompanyListModel::new(5), pager)
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_token_error_in_body_reauthenticates_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/grant/"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a1", "expires_in": 3600, "refresh_token": "r1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/grant/"))
        .and(query_param("grant_type", "refresh_token"))
        .and(query_param("refresh_token", "r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a2", "expires_in": 3600, "refresh_token": "r2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/companies/getAll/"))
        .and(query_param("access_token", "a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "The access token provided is invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/companies/getAll/"))
        .and(query_param("access_token", "a2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"company_id": 5, "name": "Acme"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = MoloniConfig::with_password("dev-id", "dev-secret", "me@example.com", "pw");
    config.base_url = server.uri();
    config.http = fast_http();
    let client = MoloniClient::new(config).unwrap();

    let companies = client.companies().get_all().await.unwrap();
    assert_eq!(companies[0].name, "Acme");
}

#[tokio::test]
async fn test_token_error_with_static_token_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "Expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.companies().get_all().await.unwrap_err();
    assert_eq!(err.api_errors()[0].code, "invalid_token");
}

#[tokio::test]
async fn test_call_raw() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/getBySearch/"))
        .and(body_json(json!({"company_id": 5, "search": "silva"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"customer_id": 1}])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = client
        .call_raw(
            customers::GET_BY_SEARCH,
            json!({"company_id": 5, "search": "silva"}),
        )
        .await
        .unwrap();
    assert_eq!(body, json!([{"customer_id": 1}]));

    let err = client
        .call_raw(customers::GET_BY_SEARCH, json!([1, 2]))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_new_rejects_invalid_config() {
    let err = MoloniClient::new(MoloniConfig::default()).unwrap_err();
    match err {
        Error::MissingConfigField { field } => assert_eq!(field, "auth"),
        other => panic!("unexpected error: {other:?}"),
    }
}
