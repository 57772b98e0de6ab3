//! Customers
//!
//! Besides plain CRUD, customers can be looked up by VAT, number, name or
//! free-text search, and synced incrementally with `getModifiedSince`.

use super::common::{
    ByName, ByNumber, ByVat, CompanyListModel, CompanyScope, DocumentCopies, ModifiedSinceModel,
    NumberAnswer, SearchModel,
};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const COUNT: Endpoint = Endpoint::new("customers", "count");
pub const GET_ALL: Endpoint = Endpoint::new("customers", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("customers", "getOne");
pub const COUNT_BY_SEARCH: Endpoint = Endpoint::new("customers", "countBySearch");
pub const GET_BY_SEARCH: Endpoint = Endpoint::new("customers", "getBySearch");
pub const GET_BY_VAT: Endpoint = Endpoint::new("customers", "getByVat");
pub const GET_BY_NUMBER: Endpoint = Endpoint::new("customers", "getByNumber");
pub const GET_BY_NAME: Endpoint = Endpoint::new("customers", "getByName");
pub const GET_LAST_NUMBER: Endpoint = Endpoint::new("customers", "getLastNumber");
pub const GET_NEXT_NUMBER: Endpoint = Endpoint::new("customers", "getNextNumber");
pub const COUNT_MODIFIED_SINCE: Endpoint = Endpoint::new("customers", "countModifiedSince");
pub const GET_MODIFIED_SINCE: Endpoint = Endpoint::new("customers", "getModifiedSince");
pub const INSERT: Endpoint = Endpoint::new("customers", "insert");
pub const UPDATE: Endpoint = Endpoint::new("customers", "update");
pub const DELETE: Endpoint = Endpoint::new("customers", "delete");

pub const ENDPOINTS: &[Endpoint] = &[
    COUNT,
    GET_ALL,
    GET_ONE,
    COUNT_BY_SEARCH,
    GET_BY_SEARCH,
    GET_BY_VAT,
    GET_BY_NUMBER,
    GET_BY_NAME,
    GET_LAST_NUMBER,
    GET_NEXT_NUMBER,
    COUNT_MODIFIED_SINCE,
    GET_MODIFIED_SINCE,
    INSERT,
    UPDATE,
    DELETE,
];

const ID_FIELD: &str = "customer_id";

// ============================================================================
// Requests
// ============================================================================

/// `{ company_id, customer_id }` for `getOne` and `delete`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CustomerLookup {
    pub company_id: Id,
    pub customer_id: Id,
}

impl Validate for CustomerLookup {
    fn validate(&self) -> Result<()> {
        Rules::new("CustomerLookup")
            .id("company_id", self.company_id)?
            .id("customer_id", self.customer_id)?;
        Ok(())
    }
}

/// Parameters of `customers/insert`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerInsert {
    pub company_id: Id,
    pub vat: String,
    pub number: String,
    pub name: String,
    pub language_id: Id,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub city: String,
    pub country_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesman_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_class_id: Option<Id>,
    pub maturity_date_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copies: Vec<DocumentCopies>,
    pub payment_method_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_notes: Option<String>,
}

impl Validate for CustomerInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("CustomerInsert")
            .id("company_id", self.company_id)?
            .text("vat", &self.vat)?
            .text("number", &self.number)?
            .text("name", &self.name)?
            .id("language_id", self.language_id)?
            .text("address", &self.address)?
            .text("city", &self.city)?
            .id("country_id", self.country_id)?
            .id("maturity_date_id", self.maturity_date_id)?
            .id("payment_method_id", self.payment_method_id)?
            .opt_id("salesman_id", self.salesman_id)?
            .percent("discount", self.discount)?
            .opt_non_negative("credit_limit", self.credit_limit)?
            .each("copies", &self.copies)?;
        Ok(())
    }
}

/// Parameters of `customers/update`: the id plus every insert field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerUpdate {
    pub customer_id: Id,
    #[serde(flatten)]
    pub customer: CustomerInsert,
}

impl Validate for CustomerUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("CustomerUpdate").id("customer_id", self.customer_id)?;
        self.customer.validate()
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "de::id")]
    pub customer_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub number: String,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub vat: Option<String>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub language_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub country_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub salesman_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub maturity_date_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub payment_method_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub credit_limit: Option<f64>,
    #[serde(default)]
    pub copies: Vec<DocumentCopies>,
}

// ============================================================================
// Handle
// ============================================================================

/// `client.customers()`
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn customers(&self) -> Customers<'_> {
        Customers { client: self }
    }
}

impl Customers<'_> {
    pub async fn count(&self, company_id: Id) -> Result<u64> {
        self.client.count(COUNT, &CompanyScope::new(company_id)).await
    }

    /// One page of customers
    pub async fn get_all(&self, request: &CompanyListModel) -> Result<Vec<Customer>> {
        self.client.call(GET_ALL, request).await
    }

    /// Every customer, walking all pages
    pub async fn get_all_pages(&self, company_id: Id) -> Result<Vec<Customer>> {
        self.client
            .fetch_all(GET_ALL, &CompanyListModel::new(company_id))
            .await
    }

    pub async fn get_one(&self, company_id: Id, customer_id: Id) -> Result<Option<Customer>> {
        let request = CustomerLookup {
            company_id,
            customer_id,
        };
        self.client.call_optional(GET_ONE, &request).await
    }

    pub async fn count_by_search(&self, company_id: Id, search: &str) -> Result<u64> {
        self.client
            .count(COUNT_BY_SEARCH, &SearchModel::new(company_id, search))
            .await
    }

    pub async fn get_by_search(&self, request: &SearchModel) -> Result<Vec<Customer>> {
        self.client.call(GET_BY_SEARCH, request).await
    }

    pub async fn get_by_vat(&self, request: &ByVat) -> Result<Vec<Customer>> {
        self.client.call(GET_BY_VAT, request).await
    }

    pub async fn get_by_number(&self, request: &ByNumber) -> Result<Vec<Customer>> {
        self.client.call(GET_BY_NUMBER, request).await
    }

    pub async fn get_by_name(&self, request: &ByName) -> Result<Vec<Customer>> {
        self.client.call(GET_BY_NAME, request).await
    }

    /// Highest customer number in use
    pub async fn get_last_number(&self, company_id: Id) -> Result<String> {
        let answer: NumberAnswer = self
            .client
            .call(GET_LAST_NUMBER, &CompanyScope::new(company_id))
            .await?;
        Ok(answer.number)
    }

    /// Number the next inserted customer should take
    pub async fn get_next_number(&self, company_id: Id) -> Result<String> {
        let answer: NumberAnswer = self
            .client
            .call(GET_NEXT_NUMBER, &CompanyScope::new(company_id))
            .await?;
        Ok(answer.number)
    }

    pub async fn count_modified_since(&self, request: &ModifiedSinceModel) -> Result<u64> {
        self.client.count(COUNT_MODIFIED_SINCE, request).await
    }

    pub async fn get_modified_since(&self, request: &ModifiedSinceModel) -> Result<Vec<Customer>> {
        self.client.fetch_all(GET_MODIFIED_SINCE, request).await
    }

    /// Returns the new `customer_id`
    pub async fn insert(&self, customer: &CustomerInsert) -> Result<Id> {
        self.client.mutate(INSERT, customer, ID_FIELD).await
    }

    pub async fn update(&self, customer: &CustomerUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, customer, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, customer_id: Id) -> Result<()> {
        let request = CustomerLookup {
            company_id,
            customer_id,
        };
        self.client.delete(DELETE, &request).await
    }
}
