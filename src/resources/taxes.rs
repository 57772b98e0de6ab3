//! Taxes (VAT rates, stamp duty, fixed-amount taxes)

use super::common::{record_lookup, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("taxes", "getAll");
pub const INSERT: Endpoint = Endpoint::new("taxes", "insert");
pub const UPDATE: Endpoint = Endpoint::new("taxes", "update");
pub const DELETE: Endpoint = Endpoint::new("taxes", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "tax_id";

/// `type`: 1 percentage, 2 fixed amount, 3 fixed amount per quantity
pub const TAX_TYPES: &[u8] = &[1, 2, 3];
/// `saft_type`: 1 VAT, 2 stamp duty, 3 other
pub const SAFT_TYPES: &[u8] = &[1, 2, 3];
/// `vat_type` codes used in SAF-T exports
pub const VAT_TYPES: &[&str] = &["RED", "INT", "NOR", "ISE", "OUT"];

record_lookup!(TaxLookup, tax_id);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxInsert {
    pub company_id: Id,
    pub name: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub tax_type: u8,
    pub saft_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp_tax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exemption_reason: Option<String>,
    pub fiscal_zone: String,
    #[serde(with = "flag")]
    pub active_by_default: bool,
}

impl TaxInsert {
    /// Percentage VAT rate for a fiscal zone (`PT`, `PT-AC`, `PT-MA`, ...)
    pub fn vat(company_id: Id, name: impl Into<String>, value: f64, fiscal_zone: &str) -> Self {
        Self {
            company_id,
            name: name.into(),
            value,
            tax_type: 1,
            saft_type: 1,
            vat_type: Some("NOR".to_string()),
            stamp_tax: None,
            exemption_reason: None,
            fiscal_zone: fiscal_zone.to_string(),
            active_by_default: false,
        }
    }
}

impl Validate for TaxInsert {
    fn validate(&self) -> Result<()> {
        let rules = Rules::new("TaxInsert");
        rules
            .id("company_id", self.company_id)?
            .text("name", &self.name)?
            .non_negative("value", self.value)?
            .one_of("type", &self.tax_type, TAX_TYPES)?
            .one_of("saft_type", &self.saft_type, SAFT_TYPES)?
            .text("fiscal_zone", &self.fiscal_zone)?;
        if self.tax_type == 1 {
            rules.percent("value", Some(self.value))?;
        }
        if let Some(vat_type) = self.vat_type.as_deref() {
            rules.one_of("vat_type", &vat_type, VAT_TYPES)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxUpdate {
    pub tax_id: Id,
    #[serde(flatten)]
    pub tax: TaxInsert,
}

impl Validate for TaxUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("TaxUpdate").id("tax_id", self.tax_id)?;
        self.tax.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tax {
    #[serde(deserialize_with = "de::id")]
    pub tax_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub value: Option<f64>,
    #[serde(rename = "type", default, deserialize_with = "de::option_i64")]
    pub tax_type: Option<i64>,
    #[serde(default, deserialize_with = "de::option_i64")]
    pub saft_type: Option<i64>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub vat_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub stamp_tax: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub exemption_reason: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub fiscal_zone: Option<String>,
    #[serde(default, with = "flag")]
    pub active_by_default: bool,
}

/// `client.taxes()`
#[derive(Debug, Clone, Copy)]
pub struct Taxes<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn taxes(&self) -> Taxes<'_> {
        Taxes { client: self }
    }
}

impl Taxes<'_> {
    pub async fn get_all(&self, company_id: Id) -> Result<Vec<Tax>> {
        self.client
            .call(GET_ALL, &CompanyScope::new(company_id))
            .await
    }

    pub async fn insert(&self, tax: &TaxInsert) -> Result<Id> {
        self.client.mutate(INSERT, tax, ID_FIELD).await
    }

    pub async fn update(&self, tax: &TaxUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, tax, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, tax_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &TaxLookup::new(company_id, tax_id))
            .await
    }
}
