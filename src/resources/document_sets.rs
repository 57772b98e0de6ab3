//! Document sets (numbering series)

use super::common::{record_lookup, CompanyScope};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{de, flag, Id};
use crate::validate::{Rules, Validate};
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("documentSets", "getAll");
pub const INSERT: Endpoint = Endpoint::new("documentSets", "insert");
pub const UPDATE: Endpoint = Endpoint::new("documentSets", "update");
pub const DELETE: Endpoint = Endpoint::new("documentSets", "delete");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "document_set_id";

record_lookup!(DocumentSetLookup, document_set_id);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSetInsert {
    pub company_id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Id>,
    #[serde(with = "flag")]
    pub active_by_default: bool,
}

impl Validate for DocumentSetInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("DocumentSetInsert")
            .id("company_id", self.company_id)?
            .text("name", &self.name)?
            .opt_id("template_id", self.template_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSetUpdate {
    pub document_set_id: Id,
    #[serde(flatten)]
    pub document_set: DocumentSetInsert,
}

impl Validate for DocumentSetUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("DocumentSetUpdate").id("document_set_id", self.document_set_id)?;
        self.document_set.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentSet {
    #[serde(deserialize_with = "de::id")]
    pub document_set_id: Id,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_id")]
    pub template_id: Option<Id>,
    #[serde(default, with = "flag")]
    pub active_by_default: bool,
}

/// `client.document_sets()`
#[derive(Debug, Clone, Copy)]
pub struct DocumentSets<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn document_sets(&self) -> DocumentSets<'_> {
        DocumentSets { client: self }
    }
}

impl DocumentSets<'_> {
    pub async fn get_all(&self, company_id: Id) -> Result<Vec<DocumentSet>> {
        self.client
            .call(GET_ALL, &CompanyScope::new(company_id))
            .await
    }

    pub async fn insert(&self, document_set: &DocumentSetInsert) -> Result<Id> {
        self.client.mutate(INSERT, document_set, ID_FIELD).await
    }

    pub async fn update(&self, document_set: &DocumentSetUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, document_set, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, document_set_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &DocumentSetLookup::new(company_id, document_set_id))
            .await
    }
}
