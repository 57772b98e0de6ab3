//! Base request dispatch
//!
//! Every endpoint call goes through [`MoloniClient`]:
//!
//! 1. validate the request model
//! 2. render the endpoint template with the configured API version
//! 3. POST the model as JSON with `access_token` and `json=true`
//! 4. detect application errors, then decode the typed response
//!
//! Resource handles (`client.customers()`, `client.invoices()`, ...) borrow
//! the client; request models never hold a reference to it.

mod response;

pub use response::{extract_errors, is_empty_result, is_token_error};

use crate::auth::Authenticator;
use crate::config::MoloniConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{OffsetPager, Paginated};
use crate::resources::Endpoint;
use crate::types::{Id, JsonValue};
use crate::validate::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for the Moloni REST API
pub struct MoloniClient {
    config: MoloniConfig,
    http: HttpClient,
    auth: Arc<Authenticator>,
}

impl MoloniClient {
    /// Build a client; the config is validated first
    pub fn new(config: MoloniConfig) -> Result<Self> {
        config.validate()?;

        let http_config = config.http.to_client_config(&config.base_url);
        let mut http = HttpClient::with_config(http_config)?;
        let auth = Arc::new(Authenticator::with_client(&config, http.inner().clone()));
        http.set_authenticator(Arc::clone(&auth));

        Ok(Self { config, http, auth })
    }

    /// Build a client from `MOLONI_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(MoloniConfig::from_env())
    }

    pub fn config(&self) -> &MoloniConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Path of an endpoint for the configured version, e.g. `v1/taxes/getAll/`
    pub fn endpoint_path(&self, endpoint: Endpoint) -> Result<String> {
        endpoint.path(&self.config.api_version)
    }

    /// Call an endpoint and decode the response into `T`
    pub async fn call<M, T>(&self, endpoint: Endpoint, model: &M) -> Result<T>
    where
        M: Serialize + Validate,
        T: DeserializeOwned,
    {
        let body = self.send(endpoint, model).await?;
        decode(endpoint, body)
    }

    /// Call a single-record endpoint; "not found" bodies become `None`
    pub async fn call_optional<M, T>(&self, endpoint: Endpoint, model: &M) -> Result<Option<T>>
    where
        M: Serialize + Validate,
        T: DeserializeOwned,
    {
        let body = self.send(endpoint, model).await?;
        if is_empty_result(&body) {
            return Ok(None);
        }
        decode(endpoint, body).map(Some)
    }

    /// Call a `count*` endpoint
    pub async fn count<M>(&self, endpoint: Endpoint, model: &M) -> Result<u64>
    where
        M: Serialize + Validate,
    {
        let body = self.send(endpoint, model).await?;
        response::parse_count(&endpoint.name(), &body)
    }

    /// Call an `insert`/`update` endpoint and return the affected id
    pub async fn mutate<M>(&self, endpoint: Endpoint, model: &M, id_field: &str) -> Result<Id>
    where
        M: Serialize + Validate,
    {
        let body = self.send(endpoint, model).await?;
        response::parse_mutation(&endpoint.name(), &body, id_field)
    }

    /// Call a `delete` endpoint
    pub async fn delete<M>(&self, endpoint: Endpoint, model: &M) -> Result<()>
    where
        M: Serialize + Validate,
    {
        let body = self.send(endpoint, model).await?;
        response::parse_deleted(&endpoint.name(), &body)
    }

    /// Walk every page of a list endpoint
    pub async fn fetch_all<M, T>(&self, endpoint: Endpoint, model: &M) -> Result<Vec<T>>
    where
        M: Serialize + Validate + Paginated + Clone,
        T: DeserializeOwned,
    {
        self.fetch_pages(endpoint, model, OffsetPager::from_page(model.page()))
            .await
    }

    /// Walk pages with an explicit pager (page size, record cap)
    pub async fn fetch_pages<M, T>(
        &self,
        endpoint: Endpoint,
        model: &M,
        mut pager: OffsetPager,
    ) -> Result<Vec<T>>
    where
        M: Serialize + Validate + Paginated + Clone,
        T: DeserializeOwned,
    {
        let mut request = model.clone();
        let mut records = Vec::new();

        while let Some(page) = pager.next_page() {
            request.set_page(page);
            let batch: Vec<T> = self.call(endpoint, &request).await?;
            debug!(
                "{}: page at offset {:?} returned {} records",
                endpoint,
                page.offset,
                batch.len()
            );
            pager.advance(batch.len());
            records.extend(batch);
        }

        if let Some(max) = pager.max_records() {
            records.truncate(max as usize);
        }

        Ok(records)
    }

    /// Untyped call, for callers that build parameters at runtime
    pub async fn call_raw(&self, endpoint: Endpoint, params: JsonValue) -> Result<JsonValue> {
        if !params.is_object() {
            return Err(Error::validation(
                "RawParams",
                "params",
                format!("parameters for {endpoint} must be a JSON object"),
            ));
        }
        self.dispatch(endpoint, params).await
    }

    /// Validate, serialize and dispatch a model
    async fn send<M>(&self, endpoint: Endpoint, model: &M) -> Result<JsonValue>
    where
        M: Serialize + Validate,
    {
        model.validate()?;
        let params = serde_json::to_value(model)?;
        self.dispatch(endpoint, params).await
    }

    /// POST the parameters and unwrap the response envelope.
    ///
    /// A token error reported in the body triggers one re-authentication.
    async fn dispatch(&self, endpoint: Endpoint, params: JsonValue) -> Result<JsonValue> {
        let path = self.endpoint_path(endpoint)?;
        let name = endpoint.name();

        let mut reauthenticated = false;
        loop {
            let body = self.post(endpoint, &path, &params).await?;

            match response::extract_errors(&body) {
                None => return Ok(body),
                Some(errors) if !reauthenticated && is_token_error(&errors) => {
                    if !self.auth.invalidate().await {
                        return Err(Error::api(name, errors));
                    }
                    warn!("{name}: access token rejected, re-authenticating");
                    reauthenticated = true;
                }
                Some(errors) => return Err(Error::api(name, errors)),
            }
        }
    }

    async fn post(&self, endpoint: Endpoint, path: &str, params: &JsonValue) -> Result<JsonValue> {
        let mut request = RequestConfig::new()
            .query("json", "true")
            .json(params.clone())
            .read_only(endpoint.is_read_only());
        if self.config.human_errors {
            request = request.query("human_errors", "true");
        }

        let response = match self.http.post(path, request).await {
            Ok(response) => response,
            // Error envelopes also arrive with 4xx statuses
            Err(Error::HttpStatus { status, body }) => {
                return match serde_json::from_str::<JsonValue>(&body) {
                    Ok(parsed) if response::extract_errors(&parsed).is_some() => Ok(parsed),
                    _ => Err(Error::HttpStatus { status, body }),
                };
            }
            Err(e) => return Err(e),
        };

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            Error::decode(path, format!("response is not valid JSON ({e}): {text}"))
        })
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: JsonValue) -> Result<T> {
    serde_json::from_value(body).map_err(|e| Error::decode(endpoint.name(), e.to_string()))
}

impl std::fmt::Debug for MoloniClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoloniClient")
            .field("config", &self.config)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
