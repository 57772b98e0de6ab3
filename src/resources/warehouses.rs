//! Warehouses holding product stock

use super::common::{record_lookup, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("warehouses", "getAll");
pub const INSERT: Endpoint = Endpoint::new("warehouses", "insert");
pub const UPDATE: Endpoint = Endpoint::new("warehouses", "update");
pub const DELETE: Endpoint = Endpoint::new("warehouses", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "warehouse_id";

record_lookup!(WarehouseLookup, warehouse_id);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarehouseInsert {
    pub company_id: Id,
    pub title: String,
    #[serde(with = "flag")]
    pub is_default: bool,
    pub code: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl Validate for WarehouseInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("WarehouseInsert")
            .id("company_id", self.company_id)?
            .text("title", &self.title)?
            .text("code", &self.code)?
            .text("address", &self.address)?
            .text("city", &self.city)?
            .text("zip_code", &self.zip_code)?
            .id("country_id", self.country_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarehouseUpdate {
    pub warehouse_id: Id,
    #[serde(flatten)]
    pub warehouse: WarehouseInsert,
}

impl Validate for WarehouseUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("WarehouseUpdate").id("warehouse_id", self.warehouse_id)?;
        self.warehouse.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Warehouse {
    #[serde(deserialize_with = "de::id")]
    pub warehouse_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub title: String,
    #[serde(default, with = "flag")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "de::option_string")]
    pub code: Option<String>,
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
    pub contact_name: Option<String>,
}

/// `client.warehouses()`
#[derive(Debug, Clone, Copy)]
pub struct Warehouses<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn warehouses(&self) -> Warehouses<'_> {
        Warehouses { client: self }
    }
}

impl Warehouses<'_> {
    pub async fn get_all(&self, company_id: Id) -> Result<Vec<Warehouse>> {
        self.client
            .call(GET_ALL, &CompanyScope::new(company_id))
            .await
    }

    pub async fn insert(&self, warehouse: &WarehouseInsert) -> Result<Id> {
        self.client.mutate(INSERT, warehouse, ID_FIELD).await
    }

    pub async fn update(&self, warehouse: &WarehouseUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, warehouse, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, warehouse_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &WarehouseLookup::new(company_id, warehouse_id))
            .await
    }
}
