//! Product categories (a tree rooted at `parent_id = 0`)

use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("productCategories", "getAll");
pub const INSERT: Endpoint = Endpoint::new("productCategories", "insert");
pub const UPDATE: Endpoint = Endpoint::new("productCategories", "update");
pub const DELETE: Endpoint = Endpoint::new("productCategories", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "category_id";

/// Children of `parent_id` (0 for top-level categories)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryChildren {
    pub company_id: Id,
    pub parent_id: Id,
}

impl Validate for CategoryChildren {
    fn validate(&self) -> Result<()> {
        Rules::new("CategoryChildren").id("company_id", self.company_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryInsert {
    pub company_id: Id,
    pub parent_id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pos_enabled: Option<bool>,
}

impl Validate for CategoryInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("CategoryInsert")
            .id("company_id", self.company_id)?
            .text("name", &self.name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryUpdate {
    pub category_id: Id,
    #[serde(flatten)]
    pub category: CategoryInsert,
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("CategoryUpdate").id("category_id", self.category_id)?;
        self.category.validate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDelete {
    pub company_id: Id,
    pub category_id: Id,
}

impl Validate for CategoryDelete {
    fn validate(&self) -> Result<()> {
        Rules::new("CategoryDelete")
            .id("company_id", self.company_id)?
            .id("category_id", self.category_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductCategory {
    #[serde(deserialize_with = "de::id")]
    pub category_id: Id,
    #[serde(default, deserialize_with = "de::option_id")]
    pub parent_id: Option<Id>,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::option_i64")]
    pub num_categories: Option<i64>,
    #[serde(default, deserialize_with = "de::option_i64")]
    pub num_products: Option<i64>,
    #[serde(default, with = "flag")]
    pub pos_enabled: bool,
}

/// `client.product_categories()`
#[derive(Debug, Clone, Copy)]
pub struct ProductCategories<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn product_categories(&self) -> ProductCategories<'_> {
        ProductCategories { client: self }
    }
}

impl ProductCategories<'_> {
    /// Direct children of `parent_id`
    pub async fn get_all(&self, company_id: Id, parent_id: Id) -> Result<Vec<ProductCategory>> {
        let request = CategoryChildren {
            company_id,
            parent_id,
        };
        self.client.call(GET_ALL, &request).await
    }

    pub async fn insert(&self, category: &CategoryInsert) -> Result<Id> {
        self.client.mutate(INSERT, category, ID_FIELD).await
    }

    pub async fn update(&self, category: &CategoryUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, category, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, category_id: Id) -> Result<()> {
        let request = CategoryDelete {
            company_id,
            category_id,
        };
        self.client.delete(DELETE, &request).await
    }
}
