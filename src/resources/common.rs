//! Request scopes and nested records shared by several resources

use crate::error::Result;
use crate::pagination::{impl_paginated, Page};
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request scopes
// ============================================================================

/// Parameters of endpoints that take nothing at all
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

impl Validate for NoParams {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// `{ company_id }`, used by counts and non-paginated lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompanyScope {
    pub company_id: Id,
}

impl CompanyScope {
    pub fn new(company_id: Id) -> Self {
        Self { company_id }
    }
}

impl Validate for CompanyScope {
    fn validate(&self) -> Result<()> {
        Rules::new("CompanyScope").id("company_id", self.company_id)?;
        Ok(())
    }
}

/// `{ company_id, qty, offset }` for paginated `getAll` endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompanyListModel {
    pub company_id: Id,
    #[serde(flatten)]
    pub page: Page,
}

impl CompanyListModel {
    pub fn new(company_id: Id) -> Self {
        Self {
            company_id,
            page: Page::default(),
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }
}

impl Validate for CompanyListModel {
    fn validate(&self) -> Result<()> {
        Rules::new("CompanyListModel")
            .id("company_id", self.company_id)?
            .qty(self.page.qty)?;
        Ok(())
    }
}

/// Free-text search (`countBySearch`, `getBySearch`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchModel {
    pub company_id: Id,
    pub search: String,
    #[serde(flatten)]
    pub page: Page,
}

impl SearchModel {
    pub fn new(company_id: Id, search: impl Into<String>) -> Self {
        Self {
            company_id,
            search: search.into(),
            page: Page::default(),
        }
    }
}

impl Validate for SearchModel {
    fn validate(&self) -> Result<()> {
        Rules::new("SearchModel")
            .id("company_id", self.company_id)?
            .text("search", &self.search)?
            .qty(self.page.qty)?;
        Ok(())
    }
}

/// Records changed after a timestamp (`countModifiedSince`, `getModifiedSince`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModifiedSinceModel {
    pub company_id: Id,
    #[serde(with = "crate::types::datetime")]
    pub lastmodified: chrono::NaiveDateTime,
    #[serde(flatten)]
    pub page: Page,
}

impl ModifiedSinceModel {
    pub fn new(company_id: Id, lastmodified: chrono::NaiveDateTime) -> Self {
        Self {
            company_id,
            lastmodified,
            page: Page::default(),
        }
    }
}

impl Validate for ModifiedSinceModel {
    fn validate(&self) -> Result<()> {
        Rules::new("ModifiedSinceModel")
            .id("company_id", self.company_id)?
            .qty(self.page.qty)?;
        Ok(())
    }
}

/// Lookup by one exact field, e.g. `{ company_id, vat, qty, offset }`
macro_rules! field_query {
    ($(#[$doc:meta])* $model:ident, $field:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
        pub struct $model {
            pub company_id: $crate::types::Id,
            pub $field: String,
            #[serde(flatten)]
            pub page: $crate::pagination::Page,
        }

        impl $model {
            pub fn new(company_id: $crate::types::Id, $field: impl Into<String>) -> Self {
                Self {
                    company_id,
                    $field: $field.into(),
                    page: $crate::pagination::Page::default(),
                }
            }
        }

        impl $crate::validate::Validate for $model {
            fn validate(&self) -> $crate::error::Result<()> {
                $crate::validate::Rules::new(stringify!($model))
                    .id("company_id", self.company_id)?
                    .text(stringify!($field), &self.$field)?
                    .qty(self.page.qty)?;
                Ok(())
            }
        }
    };
}

field_query!(
    /// `getByVat`
    ByVat,
    vat
);
field_query!(
    /// `getByName`
    ByName,
    name
);
field_query!(
    /// `getByNumber`
    ByNumber,
    number
);
field_query!(
    /// `getByReference`
    ByReference,
    reference
);
field_query!(
    /// `getByEAN`
    ByEan,
    ean
);

/// `{ company_id, <record>_id }` addressing one record, e.g. for `delete`
macro_rules! record_lookup {
    ($(#[$doc:meta])* $model:ident, $id:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
        pub struct $model {
            pub company_id: $crate::types::Id,
            pub $id: $crate::types::Id,
        }

        impl $model {
            pub fn new(company_id: $crate::types::Id, $id: $crate::types::Id) -> Self {
                Self { company_id, $id }
            }
        }

        impl $crate::validate::Validate for $model {
            fn validate(&self) -> $crate::error::Result<()> {
                $crate::validate::Rules::new(stringify!($model))
                    .id("company_id", self.company_id)?
                    .id(stringify!($id), self.$id)?;
                Ok(())
            }
        }
    };
}

pub(crate) use record_lookup;

impl_paginated!(
    CompanyListModel,
    SearchModel,
    ModifiedSinceModel,
    ByVat,
    ByName,
    ByNumber,
    ByReference,
    ByEan,
);

// ============================================================================
// Nested records
// ============================================================================

/// Tax applied to a product or document line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    #[serde(deserialize_with = "de::id")]
    pub tax_id: Id,
    #[serde(
        default,
        deserialize_with = "de::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<f64>,
    #[serde(
        default,
        deserialize_with = "de::option_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,
    #[serde(
        default,
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub cumulative: Option<bool>,
}

impl TaxLine {
    pub fn new(tax_id: Id) -> Self {
        Self {
            tax_id,
            ..Self::default()
        }
    }
}

impl Validate for TaxLine {
    fn validate(&self) -> Result<()> {
        Rules::new("TaxLine")
            .id("tax_id", self.tax_id)?
            .opt_non_negative("value", self.value)?;
        Ok(())
    }
}

/// Line of a sales document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    #[serde(deserialize_with = "de::id")]
    pub product_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "de::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub qty: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub price: f64,
    #[serde(
        default,
        deserialize_with = "de::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "de::option_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub deduction_id: Option<Id>,
    #[serde(
        default,
        deserialize_with = "de::option_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,
    #[serde(
        default,
        deserialize_with = "de::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub exemption_reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::option_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub warehouse_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<TaxLine>,
}

impl ProductLine {
    pub fn new(product_id: Id, name: impl Into<String>, qty: f64, price: f64) -> Self {
        Self {
            product_id,
            name: name.into(),
            qty,
            price,
            ..Self::default()
        }
    }
}

impl Validate for ProductLine {
    fn validate(&self) -> Result<()> {
        let rules = Rules::new("ProductLine");
        rules
            .id("product_id", self.product_id)?
            .text("name", &self.name)?
            .non_negative("qty", self.qty)?
            .non_negative("price", self.price)?
            .percent("discount", self.discount)?
            .opt_id("warehouse_id", self.warehouse_id)?
            .each("taxes", &self.taxes)?;
        // Untaxed lines must say why
        if self.taxes.is_empty() {
            rules.text(
                "exemption_reason",
                self.exemption_reason.as_deref().unwrap_or_default(),
            )?;
        }
        Ok(())
    }
}

/// Reference from a document to an earlier one it settles or corrects
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociatedDocument {
    #[serde(deserialize_with = "de::id")]
    pub associated_id: Id,
    #[serde(default, deserialize_with = "de::number")]
    pub value: f64,
}

impl Validate for AssociatedDocument {
    fn validate(&self) -> Result<()> {
        Rules::new("AssociatedDocument")
            .id("associated_id", self.associated_id)?
            .non_negative("value", self.value)?;
        Ok(())
    }
}

/// Payment sent with an invoice or receipt.
///
/// Documents read back carry [`DocumentPayment`](super::documents::DocumentPayment).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentLine {
    pub payment_method_id: Id,
    pub date: NaiveDate,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentLine {
    pub fn new(payment_method_id: Id, date: NaiveDate, value: f64) -> Self {
        Self {
            payment_method_id,
            date,
            value,
            notes: None,
        }
    }
}

impl Validate for PaymentLine {
    fn validate(&self) -> Result<()> {
        Rules::new("PaymentLine")
            .id("payment_method_id", self.payment_method_id)?
            .non_negative("value", self.value)?;
        Ok(())
    }
}

/// Opening stock of a product in one warehouse
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseStock {
    #[serde(deserialize_with = "de::id")]
    pub warehouse_id: Id,
    #[serde(default, deserialize_with = "de::number")]
    pub stock: f64,
}

impl Validate for WarehouseStock {
    fn validate(&self) -> Result<()> {
        Rules::new("WarehouseStock").id("warehouse_id", self.warehouse_id)?;
        Ok(())
    }
}

/// Supplier of a product with its cost price
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSupplier {
    #[serde(deserialize_with = "de::id")]
    pub supplier_id: Id,
    #[serde(
        default,
        deserialize_with = "de::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_price: Option<f64>,
    /// Supplier's own reference (the API spells it `referency`)
    #[serde(
        default,
        deserialize_with = "de::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub referency: Option<String>,
}

impl Validate for ProductSupplier {
    fn validate(&self) -> Result<()> {
        Rules::new("ProductSupplier")
            .id("supplier_id", self.supplier_id)?
            .opt_non_negative("cost_price", self.cost_price)?;
        Ok(())
    }
}

/// Number of printed copies per document type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCopies {
    #[serde(deserialize_with = "de::id")]
    pub document_type_id: Id,
    #[serde(default)]
    pub copies: u32,
}

impl Validate for DocumentCopies {
    fn validate(&self) -> Result<()> {
        Rules::new("DocumentCopies").id("document_type_id", self.document_type_id)?;
        Ok(())
    }
}

/// Answer of `getNextNumber`/`getLastNumber`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NumberAnswer {
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub number: String,
}
