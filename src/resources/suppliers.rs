//! Suppliers

use super::common::{ByName, ByVat, CompanyListModel, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const COUNT: Endpoint = Endpoint::new("suppliers", "count");
pub const GET_ALL: Endpoint = Endpoint::new("suppliers", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("suppliers", "getOne");
pub const GET_BY_VAT: Endpoint = Endpoint::new("suppliers", "getByVat");
pub const GET_BY_NAME: Endpoint = Endpoint::new("suppliers", "getByName");
pub const INSERT: Endpoint = Endpoint::new("suppliers", "insert");
pub const UPDATE: Endpoint = Endpoint::new("suppliers", "update");
pub const DELETE: Endpoint = Endpoint::new("suppliers", "delete");

pub const ENDPOINTS: &[Endpoint] = &[
    COUNT,
    GET_ALL,
    GET_ONE,
    GET_BY_VAT,
    GET_BY_NAME,
    INSERT,
    UPDATE,
    DELETE,
];

const ID_FIELD: &str = "supplier_id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SupplierLookup {
    pub company_id: Id,
    pub supplier_id: Id,
}

impl Validate for SupplierLookup {
    fn validate(&self) -> Result<()> {
        Rules::new("SupplierLookup")
            .id("company_id", self.company_id)?
            .id("supplier_id", self.supplier_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierInsert {
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
    pub maturity_date_id: Id,
    pub payment_method_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_copies_document: Option<u32>,
}

impl Validate for SupplierInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("SupplierInsert")
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
            .percent("discount", self.discount)?
            .opt_non_negative("credit_limit", self.credit_limit)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierUpdate {
    pub supplier_id: Id,
    #[serde(flatten)]
    pub supplier: SupplierInsert,
}

impl Validate for SupplierUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("SupplierUpdate").id("supplier_id", self.supplier_id)?;
        self.supplier.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Supplier {
    #[serde(deserialize_with = "de::id")]
    pub supplier_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub number: String,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub vat: Option<String>,
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
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub maturity_date_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub payment_method_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub discount: Option<f64>,
}

/// `client.suppliers()`
#[derive(Debug, Clone, Copy)]
pub struct Suppliers<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn suppliers(&self) -> Suppliers<'_> {
        Suppliers { client: self }
    }
}

impl Suppliers<'_> {
    pub async fn count(&self, company_id: Id) -> Result<u64> {
        self.client.count(COUNT, &CompanyScope::new(company_id)).await
    }

    pub async fn get_all(&self, request: &CompanyListModel) -> Result<Vec<Supplier>> {
        self.client.call(GET_ALL, request).await
    }

    pub async fn get_all_pages(&self, company_id: Id) -> Result<Vec<Supplier>> {
        self.client
            .fetch_all(GET_ALL, &CompanyListModel::new(company_id))
            .await
    }

    pub async fn get_one(&self, company_id: Id, supplier_id: Id) -> Result<Option<Supplier>> {
        let request = SupplierLookup {
            company_id,
            supplier_id,
        };
        self.client.call_optional(GET_ONE, &request).await
    }

    pub async fn get_by_vat(&self, request: &ByVat) -> Result<Vec<Supplier>> {
        self.client.call(GET_BY_VAT, request).await
    }

    pub async fn get_by_name(&self, request: &ByName) -> Result<Vec<Supplier>> {
        self.client.call(GET_BY_NAME, request).await
    }

    pub async fn insert(&self, supplier: &SupplierInsert) -> Result<Id> {
        self.client.mutate(INSERT, supplier, ID_FIELD).await
    }

    pub async fn update(&self, supplier: &SupplierUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, supplier, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, supplier_id: Id) -> Result<()> {
        let request = SupplierLookup {
            company_id,
            supplier_id,
        };
        self.client.delete(DELETE, &request).await
    }
}
