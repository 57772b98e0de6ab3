//! Maturity dates (payment terms such as "30 days")

use super::common::{record_lookup, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("maturityDates", "getAll");
pub const INSERT: Endpoint = Endpoint::new("maturityDates", "insert");
pub const UPDATE: Endpoint = Endpoint::new("maturityDates", "update");
pub const DELETE: Endpoint = Endpoint::new("maturityDates", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "maturity_date_id";

record_lookup!(MaturityDateLookup, maturity_date_id);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaturityDateInsert {
    pub company_id: Id,
    pub name: String,
    pub days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_discount: Option<f64>,
}

impl Validate for MaturityDateInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("MaturityDateInsert")
            .id("company_id", self.company_id)?
            .text("name", &self.name)?
            .percent("associated_discount", self.associated_discount)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaturityDateUpdate {
    pub maturity_date_id: Id,
    #[serde(flatten)]
    pub maturity_date: MaturityDateInsert,
}

impl Validate for MaturityDateUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("MaturityDateUpdate").id("maturity_date_id", self.maturity_date_id)?;
        self.maturity_date.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MaturityDate {
    #[serde(deserialize_with = "de::id")]
    pub maturity_date_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_i64")]
    pub days: Option<i64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub associated_discount: Option<f64>,
}

/// `client.maturity_dates()`
#[derive(Debug, Clone, Copy)]
pub struct MaturityDates<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn maturity_dates(&self) -> MaturityDates<'_> {
        MaturityDates { client: self }
    }
}

impl MaturityDates<'_> {
    pub async fn get_all(&self, company_id: Id) -> Result<Vec<MaturityDate>> {
        self.client
            .call(GET_ALL, &CompanyScope::new(company_id))
            .await
    }

    pub async fn insert(&self, maturity_date: &MaturityDateInsert) -> Result<Id> {
        self.client.mutate(INSERT, maturity_date, ID_FIELD).await
    }

    pub async fn update(&self, maturity_date: &MaturityDateUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, maturity_date, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, maturity_date_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &MaturityDateLookup::new(company_id, maturity_date_id))
            .await
    }
}
