//! Alternate (delivery) addresses of a customer

use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("customerAlternateAddresses", "getAll");
pub const INSERT: Endpoint = Endpoint::new("customerAlternateAddresses", "insert");
pub const UPDATE: Endpoint = Endpoint::new("customerAlternateAddresses", "update");
pub const DELETE: Endpoint = Endpoint::new("customerAlternateAddresses", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "address_id";

/// `{ company_id, customer_id }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CustomerScope {
    pub company_id: Id,
    pub customer_id: Id,
}

impl Validate for CustomerScope {
    fn validate(&self) -> Result<()> {
        Rules::new("CustomerScope")
            .id("company_id", self.company_id)?
            .id("customer_id", self.customer_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlternateAddressInsert {
    pub company_id: Id,
    pub customer_id: Id,
    pub designation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

impl Validate for AlternateAddressInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("AlternateAddressInsert")
            .id("company_id", self.company_id)?
            .id("customer_id", self.customer_id)?
            .text("designation", &self.designation)?
            .text("address", &self.address)?
            .text("city", &self.city)?
            .text("zip_code", &self.zip_code)?
            .id("country_id", self.country_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlternateAddressUpdate {
    pub address_id: Id,
    #[serde(flatten)]
    pub address: AlternateAddressInsert,
}

impl Validate for AlternateAddressUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("AlternateAddressUpdate").id("address_id", self.address_id)?;
        self.address.validate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlternateAddressDelete {
    pub company_id: Id,
    pub customer_id: Id,
    pub address_id: Id,
}

impl Validate for AlternateAddressDelete {
    fn validate(&self) -> Result<()> {
        Rules::new("AlternateAddressDelete")
            .id("company_id", self.company_id)?
            .id("customer_id", self.customer_id)?
            .id("address_id", self.address_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlternateAddress {
    #[serde(deserialize_with = "de::id")]
    pub address_id: Id,
    #[serde(default, deserialize_with = "de::option_id")]
    pub customer_id: Option<Id>,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub designation: String,
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
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub contact_name: Option<String>,
}

/// `client.customer_alternate_addresses()`
#[derive(Debug, Clone, Copy)]
pub struct CustomerAlternateAddresses<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn customer_alternate_addresses(&self) -> CustomerAlternateAddresses<'_> {
        CustomerAlternateAddresses { client: self }
    }
}

impl CustomerAlternateAddresses<'_> {
    pub async fn get_all(&self, company_id: Id, customer_id: Id) -> Result<Vec<AlternateAddress>> {
        let request = CustomerScope {
            company_id,
            customer_id,
        };
        self.client.call(GET_ALL, &request).await
    }

    pub async fn insert(&self, address: &AlternateAddressInsert) -> Result<Id> {
        self.client.mutate(INSERT, address, ID_FIELD).await
    }

    pub async fn update(&self, address: &AlternateAddressUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, address, ID_FIELD).await
    }

    pub async fn delete(&self, request: &AlternateAddressDelete) -> Result<()> {
        self.client.delete(DELETE, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_serialization() {
        let update = AlternateAddressUpdate {
            address_id: 9,
            address: AlternateAddressInsert {
                company_id: 1,
                customer_id: 2,
                designation: "Warehouse".into(),
                address: "Zona Industrial".into(),
                city: "Braga".into(),
                zip_code: "4700-000".into(),
                country_id: 1,
                ..AlternateAddressInsert::default()
            },
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "address_id": 9,
                "company_id": 1,
                "customer_id": 2,
                "designation": "Warehouse",
                "address": "Zona Industrial",
                "city": "Braga",
                "zip_code": "4700-000",
                "country_id": 1
            })
        );
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_delete_requires_every_id() {
        let request = AlternateAddressDelete {
            company_id: 1,
            customer_id: 2,
            address_id: 0,
        };
        assert!(request.validate().is_err());
    }
}
