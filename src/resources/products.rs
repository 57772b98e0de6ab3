//! Products and services

use super::common::{
    ByEan, ByName, ByReference, CompanyScope, ModifiedSinceModel, ProductSupplier, SearchModel,
    TaxLine, WarehouseStock,
};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::pagination::{impl_paginated, Page};
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const COUNT: Endpoint = Endpoint::new("products", "count");
pub const GET_ALL: Endpoint = Endpoint::new("products", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("products", "getOne");
pub const GET_BY_SEARCH: Endpoint = Endpoint::new("products", "getBySearch");
pub const GET_BY_NAME: Endpoint = Endpoint::new("products", "getByName");
pub const GET_BY_REFERENCE: Endpoint = Endpoint::new("products", "getByReference");
pub const GET_BY_EAN: Endpoint = Endpoint::new("products", "getByEAN");
pub const GET_MODIFIED_SINCE: Endpoint = Endpoint::new("products", "getModifiedSince");
pub const INSERT: Endpoint = Endpoint::new("products", "insert");
pub const UPDATE: Endpoint = Endpoint::new("products", "update");
pub const DELETE: Endpoint = Endpoint::new("products", "delete");

pub const ENDPOINTS: &[Endpoint] = &[
    COUNT,
    GET_ALL,
    GET_ONE,
    GET_BY_SEARCH,
    GET_BY_NAME,
    GET_BY_REFERENCE,
    GET_BY_EAN,
    GET_MODIFIED_SINCE,
    INSERT,
    UPDATE,
    DELETE,
];

const ID_FIELD: &str = "product_id";

/// Stock categories accepted in `at_product_category`
pub const AT_PRODUCT_CATEGORIES: &[&str] = &["M", "P", "A", "S", "T"];

/// Kind of item; travels as `1`/`2`/`3`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductType {
    #[default]
    Product,
    Service,
    Other,
}

impl ProductType {
    pub fn code(self) -> u8 {
        match self {
            Self::Product => 1,
            Self::Service => 2,
            Self::Other => 3,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::Product),
            2 => Some(Self::Service),
            3 => Some(Self::Other),
            _ => None,
        }
    }
}

impl Serialize for ProductType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ProductType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = de::id(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown product type: {code}")))
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductLookup {
    pub company_id: Id,
    pub product_id: Id,
}

impl Validate for ProductLookup {
    fn validate(&self) -> Result<()> {
        Rules::new("ProductLookup")
            .id("company_id", self.company_id)?
            .id("product_id", self.product_id)?;
        Ok(())
    }
}

/// `getAll` filtered by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductListModel {
    pub company_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
    #[serde(flatten)]
    pub page: Page,
}

impl ProductListModel {
    pub fn new(company_id: Id) -> Self {
        Self {
            company_id,
            ..Self::default()
        }
    }
}

impl Validate for ProductListModel {
    fn validate(&self) -> Result<()> {
        Rules::new("ProductListModel")
            .id("company_id", self.company_id)?
            .opt_id("category_id", self.category_id)?
            .qty(self.page.qty)?;
        Ok(())
    }
}

impl_paginated!(ProductListModel);

/// Parameters of `products/insert`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductInsert {
    pub company_id: Id,
    pub category_id: Id,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    pub price: f64,
    pub unit_id: Id,
    #[serde(with = "flag")]
    pub has_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<f64>,
    #[serde(
        default,
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pos_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_product_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exemption_reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<TaxLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppliers: Vec<ProductSupplier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warehouses: Vec<WarehouseStock>,
}

impl Validate for ProductInsert {
    fn validate(&self) -> Result<()> {
        let rules = Rules::new("ProductInsert");
        rules
            .id("company_id", self.company_id)?
            .id("category_id", self.category_id)?
            .text("name", &self.name)?
            .text("reference", &self.reference)?
            .non_negative("price", self.price)?
            .id("unit_id", self.unit_id)?
            .opt_non_negative("minimum_stock", self.minimum_stock)?
            .each("taxes", &self.taxes)?
            .each("suppliers", &self.suppliers)?
            .each("warehouses", &self.warehouses)?;

        if self.taxes.is_empty() {
            rules.text(
                "exemption_reason",
                self.exemption_reason.as_deref().unwrap_or_default(),
            )?;
        }
        if self.has_stock {
            let category = self.at_product_category.as_deref().unwrap_or_default();
            rules.one_of("at_product_category", &category, AT_PRODUCT_CATEGORIES)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductUpdate {
    pub product_id: Id,
    #[serde(flatten)]
    pub product: ProductInsert,
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("ProductUpdate").id("product_id", self.product_id)?;
        self.product.validate()
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "de::id")]
    pub product_id: Id,
    #[serde(default, deserialize_with = "de::option_id")]
    pub category_id: Option<Id>,
    #[serde(rename = "type", default)]
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub reference: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub ean: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "de::option_id")]
    pub unit_id: Option<Id>,
    #[serde(default, with = "flag")]
    pub has_stock: bool,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub stock: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub minimum_stock: Option<f64>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub at_product_category: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub exemption_reason: Option<String>,
    #[serde(default)]
    pub taxes: Vec<TaxLine>,
    #[serde(default)]
    pub suppliers: Vec<ProductSupplier>,
    #[serde(default)]
    pub warehouses: Vec<WarehouseStock>,
}

// ============================================================================
// Handle
// ============================================================================

/// `client.products()`
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn products(&self) -> Products<'_> {
        Products { client: self }
    }
}

impl Products<'_> {
    pub async fn count(&self, company_id: Id) -> Result<u64> {
        self.client.count(COUNT, &CompanyScope::new(company_id)).await
    }

    pub async fn get_all(&self, request: &ProductListModel) -> Result<Vec<Product>> {
        self.client.call(GET_ALL, request).await
    }

    pub async fn get_all_pages(&self, request: &ProductListModel) -> Result<Vec<Product>> {
        self.client.fetch_all(GET_ALL, request).await
    }

    pub async fn get_one(&self, company_id: Id, product_id: Id) -> Result<Option<Product>> {
        let request = ProductLookup {
            company_id,
            product_id,
        };
        self.client.call_optional(GET_ONE, &request).await
    }

    pub async fn get_by_search(&self, request: &SearchModel) -> Result<Vec<Product>> {
        self.client.call(GET_BY_SEARCH, request).await
    }

    pub async fn get_by_name(&self, request: &ByName) -> Result<Vec<Product>> {
        self.client.call(GET_BY_NAME, request).await
    }

    pub async fn get_by_reference(&self, request: &ByReference) -> Result<Vec<Product>> {
        self.client.call(GET_BY_REFERENCE, request).await
    }

    pub async fn get_by_ean(&self, request: &ByEan) -> Result<Vec<Product>> {
        self.client.call(GET_BY_EAN, request).await
    }

    pub async fn get_modified_since(&self, request: &ModifiedSinceModel) -> Result<Vec<Product>> {
        self.client.fetch_all(GET_MODIFIED_SINCE, request).await
    }

    pub async fn insert(&self, product: &ProductInsert) -> Result<Id> {
        self.client.mutate(INSERT, product, ID_FIELD).await
    }

    pub async fn update(&self, product: &ProductUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, product, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, product_id: Id) -> Result<()> {
        let request = ProductLookup {
            company_id,
            product_id,
        };
        self.client.delete(DELETE, &request).await
    }
}
