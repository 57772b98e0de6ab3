//! Reference data shared by every company

use super::common::NoParams;
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const COUNTRIES: Endpoint = Endpoint::new("countries", "getAll");
pub const CURRENCIES: Endpoint = Endpoint::new("currencies", "getAll");
pub const LANGUAGES: Endpoint = Endpoint::new("languages", "getAll");
pub const FISCAL_ZONES: Endpoint = Endpoint::new("fiscalZones", "getAll");

pub const ENDPOINTS: &[Endpoint] = &[COUNTRIES, CURRENCIES, LANGUAGES, FISCAL_ZONES];

/// `{ country_id }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountryScope {
    pub country_id: Id,
}

impl Validate for CountryScope {
    fn validate(&self) -> Result<()> {
        Rules::new("CountryScope").id("country_id", self.country_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Country {
    #[serde(deserialize_with = "de::id")]
    pub country_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub iso_3166_1: String,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Currency {
    #[serde(deserialize_with = "de::id")]
    pub currency_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub iso4217: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Language {
    #[serde(deserialize_with = "de::id")]
    pub language_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub code: String,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FiscalZone {
    /// Zone code used by taxes, e.g. `PT-AC`
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub fiscal_zone: String,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
}

/// `client.global_data()`
#[derive(Debug, Clone, Copy)]
pub struct GlobalData<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn global_data(&self) -> GlobalData<'_> {
        GlobalData { client: self }
    }
}

impl GlobalData<'_> {
    pub async fn countries(&self) -> Result<Vec<Country>> {
        self.client.call(COUNTRIES, &NoParams {}).await
    }

    pub async fn currencies(&self) -> Result<Vec<Currency>> {
        self.client.call(CURRENCIES, &NoParams {}).await
    }

    pub async fn languages(&self) -> Result<Vec<Language>> {
        self.client.call(LANGUAGES, &NoParams {}).await
    }

    /// Fiscal zones of one country
    pub async fn fiscal_zones(&self, country_id: Id) -> Result<Vec<FiscalZone>> {
        self.client
            .call(FISCAL_ZONES, &CountryScope { country_id })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_params_is_empty_object() {
        assert_eq!(serde_json::to_value(NoParams {}).unwrap(), json!({}));
    }

    #[test]
    fn test_reference_records() {
        let countries: Vec<Country> = serde_json::from_value(json!([
            {"country_id": "1", "iso_3166_1": "PT", "name": "Portugal"},
            {"country_id": 2, "iso_3166_1": "ES", "name": "Espanha", "languages": []}
        ]))
        .unwrap();
        assert_eq!(countries[1].iso_3166_1, "ES");

        let currency: Currency =
            serde_json::from_value(json!({"currency_id": 1, "iso4217": "EUR", "symbol": "€", "name": "Euro"}))
                .unwrap();
        assert_eq!(currency.symbol.as_deref(), Some("€"));
    }

    #[test]
    fn test_fiscal_zone_scope() {
        assert!(CountryScope { country_id: 0 }.validate().is_err());
        assert_eq!(
            serde_json::to_value(CountryScope { country_id: 1 }).unwrap(),
            json!({"country_id": 1})
        );
    }
}
