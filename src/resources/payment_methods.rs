//! Payment methods

use super::common::{record_lookup, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("paymentMethods", "getAll");
pub const INSERT: Endpoint = Endpoint::new("paymentMethods", "insert");
pub const UPDATE: Endpoint = Endpoint::new("paymentMethods", "update");
pub const DELETE: Endpoint = Endpoint::new("paymentMethods", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "payment_method_id";

record_lookup!(PaymentMethodLookup, payment_method_id);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentMethodInsert {
    pub company_id: Id,
    pub name: String,
    /// Cash-like method (counts towards the till)
    #[serde(
        default,
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_numerary: Option<bool>,
}

impl Validate for PaymentMethodInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("PaymentMethodInsert")
            .id("company_id", self.company_id)?
            .text("name", &self.name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentMethodUpdate {
    pub payment_method_id: Id,
    #[serde(flatten)]
    pub payment_method: PaymentMethodInsert,
}

impl Validate for PaymentMethodUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("PaymentMethodUpdate").id("payment_method_id", self.payment_method_id)?;
        self.payment_method.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentMethod {
    #[serde(deserialize_with = "de::id")]
    pub payment_method_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, with = "flag")]
    pub is_numerary: bool,
}

/// `client.payment_methods()`
#[derive(Debug, Clone, Copy)]
pub struct PaymentMethods<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn payment_methods(&self) -> PaymentMethods<'_> {
        PaymentMethods { client: self }
    }
}

impl PaymentMethods<'_> {
    pub async fn get_all(&self, company_id: Id) -> Result<Vec<PaymentMethod>> {
        self.client
            .call(GET_ALL, &CompanyScope::new(company_id))
            .await
    }

    pub async fn insert(&self, method: &PaymentMethodInsert) -> Result<Id> {
        self.client.mutate(INSERT, method, ID_FIELD).await
    }

    pub async fn update(&self, method: &PaymentMethodUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, method, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, payment_method_id: Id) -> Result<()> {
        self.client
            .delete(
                DELETE,
                &PaymentMethodLookup::new(company_id, payment_method_id),
            )
            .await
    }
}
