//! Sales documents of any type
//!
//! The request filters and the [`Document`] record are shared with the
//! typed resources (`invoices`, `receipts`), which are the same documents
//! seen through a narrower endpoint family.

use super::common::{AssociatedDocument, ProductLine};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::pagination::{impl_paginated, Page};
use crate::types::{de, Id};
use crate::validate::{Rules, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const GET_ALL: Endpoint = Endpoint::new("documents", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("documents", "getOne");
pub const GET_PDF_LINK: Endpoint = Endpoint::new("documents", "getPDFLink");

pub const ENDPOINTS: &[Endpoint] = &[GET_ALL, GET_ONE, GET_PDF_LINK];

/// Document status: draft
pub const STATUS_DRAFT: i64 = 0;
/// Document status: closed (final, numbered)
pub const STATUS_CLOSED: i64 = 1;

// ============================================================================
// Requests
// ============================================================================

/// `{ company_id, document_id }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentLookup {
    pub company_id: Id,
    pub document_id: Id,
}

impl DocumentLookup {
    pub fn new(company_id: Id, document_id: Id) -> Self {
        Self {
            company_id,
            document_id,
        }
    }
}

impl Validate for DocumentLookup {
    fn validate(&self) -> Result<()> {
        Rules::new("DocumentLookup")
            .id("company_id", self.company_id)?
            .id("document_id", self.document_id)?;
        Ok(())
    }
}

/// Filters accepted by `count` and `getAll` of every document family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSearch {
    pub company_id: Id,
    /// Only honoured by `documents/getAll`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesman_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_set_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_reference: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

impl DocumentSearch {
    pub fn new(company_id: Id) -> Self {
        Self {
            company_id,
            ..Self::default()
        }
    }
}

impl Validate for DocumentSearch {
    fn validate(&self) -> Result<()> {
        Rules::new("DocumentSearch")
            .id("company_id", self.company_id)?
            .opt_id("document_type_id", self.document_type_id)?
            .opt_id("customer_id", self.customer_id)?
            .opt_id("supplier_id", self.supplier_id)?
            .opt_id("salesman_id", self.salesman_id)?
            .opt_id("document_set_id", self.document_set_id)?
            .qty(self.page.qty)?;
        Ok(())
    }
}

impl_paginated!(DocumentSearch);

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "de::id")]
    pub document_id: Id,
    #[serde(default, deserialize_with = "de::option_id")]
    pub document_type_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub document_set_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub document_set_name: Option<String>,
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub number: String,
    #[serde(default, deserialize_with = "de::option_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::option_date")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub customer_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_id")]
    pub supplier_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub entity_number: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub entity_name: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub entity_vat: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub our_reference: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub your_reference: Option<String>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub gross_value: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub taxes_value: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub net_value: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub reconciled_value: Option<f64>,
    #[serde(default, deserialize_with = "de::option_i64")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub notes: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    #[serde(default)]
    pub payments: Vec<DocumentPayment>,
    #[serde(default)]
    pub associated_documents: Vec<AssociatedDocument>,
}

impl Document {
    pub fn is_closed(&self) -> bool {
        self.status == Some(STATUS_CLOSED)
    }
}

/// Payment as listed on a document read back from the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentPayment {
    #[serde(default, deserialize_with = "de::option_id")]
    pub payment_method_id: Option<Id>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub payment_method_name: Option<String>,
    /// `None` for the zero date `0000-00-00`
    #[serde(default, deserialize_with = "de::option_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub notes: Option<String>,
}

/// Answer of `documents/getPDFLink`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PdfLink {
    #[serde(default, deserialize_with = "de::string_lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub path: Option<String>,
}

// ============================================================================
// Handle
// ============================================================================

/// `client.documents()`
#[derive(Debug, Clone, Copy)]
pub struct Documents<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn documents(&self) -> Documents<'_> {
        Documents { client: self }
    }
}

impl Documents<'_> {
    pub async fn get_all(&self, request: &DocumentSearch) -> Result<Vec<Document>> {
        self.client.call(GET_ALL, request).await
    }

    pub async fn get_all_pages(&self, request: &DocumentSearch) -> Result<Vec<Document>> {
        self.client.fetch_all(GET_ALL, request).await
    }

    pub async fn get_one(&self, company_id: Id, document_id: Id) -> Result<Option<Document>> {
        self.client
            .call_optional(GET_ONE, &DocumentLookup::new(company_id, document_id))
            .await
    }

    /// Download link for the document's PDF; only closed documents have one
    pub async fn get_pdf_link(&self, company_id: Id, document_id: Id) -> Result<Option<PdfLink>> {
        self.client
            .call_optional(GET_PDF_LINK, &DocumentLookup::new(company_id, document_id))
            .await
    }
}
