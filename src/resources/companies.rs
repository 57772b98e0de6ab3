//! Companies the authenticated user can access

use super::common::{CompanyScope, NoParams};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use serde::Deserialize;

pub const GET_ALL: Endpoint = Endpoint::new("companies", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("companies", "getOne");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, GET_ONE];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "de::id")]
    pub company_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub vat: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub country_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub currency_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub capital: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub commercial_registration_number: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub registry_office: Option<String>,
}

/// `client.companies()`
#[derive(Debug, Clone, Copy)]
pub struct Companies<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn companies(&self) -> Companies<'_> {
        Companies { client: self }
    }
}

impl Companies<'_> {
    pub async fn get_all(&self) -> Result<Vec<Company>> {
        self.client.call(GET_ALL, &NoParams {}).await
    }

    pub async fn get_one(&self, company_id: Id) -> Result<Option<Company>> {
        self.client
            .call_optional(GET_ONE, &CompanyScope::new(company_id))
            .await
    }
}
