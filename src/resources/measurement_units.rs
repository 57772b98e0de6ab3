//! Measurement units (`Uni.`, `Kg`, `h`, ...)

use super::common::{record_lookup, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("measurementUnits", "getAll");
pub const INSERT: Endpoint = Endpoint::new("measurementUnits", "insert");
pub const UPDATE: Endpoint = Endpoint::new("measurementUnits", "update");
pub const DELETE: Endpoint = Endpoint::new("measurementUnits", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "unit_id";

record_lookup!(UnitLookup, unit_id);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitInsert {
    pub company_id: Id,
    pub name: String,
    pub short_name: String,
}

impl Validate for UnitInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("UnitInsert")
            .id("company_id", self.company_id)?
            .text("name", &self.name)?
            .text("short_name", &self.short_name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitUpdate {
    pub unit_id: Id,
    #[serde(flatten)]
    pub unit: UnitInsert,
}

impl Validate for UnitUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("UnitUpdate").id("unit_id", self.unit_id)?;
        self.unit.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MeasurementUnit {
    #[serde(deserialize_with = "de::id")]
    pub unit_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub short_name: String,
}

/// `client.measurement_units()`
#[derive(Debug, Clone, Copy)]
pub struct MeasurementUnits<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn measurement_units(&self) -> MeasurementUnits<'_> {
        MeasurementUnits { client: self }
    }
}

impl MeasurementUnits<'_> {
    pub async fn get_all(&self, company_id: Id) -> Result<Vec<MeasurementUnit>> {
        self.client
            .call(GET_ALL, &CompanyScope::new(company_id))
            .await
    }

    pub async fn insert(&self, unit: &UnitInsert) -> Result<Id> {
        self.client.mutate(INSERT, unit, ID_FIELD).await
    }

    pub async fn update(&self, unit: &UnitUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, unit, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, unit_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &UnitLookup::new(company_id, unit_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_serialization() {
        let update = UnitUpdate {
            unit_id: 4,
            unit: UnitInsert {
                company_id: 1,
                name: "Hora".into(),
                short_name: "h".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"unit_id": 4, "company_id": 1, "name": "Hora", "short_name": "h"})
        );
    }

    #[test]
    fn test_short_name_required() {
        let insert = UnitInsert {
            company_id: 1,
            name: "Hora".into(),
            short_name: String::new(),
        };
        assert!(insert.validate().is_err());
    }
}
