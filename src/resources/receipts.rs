//! Receipts settling earlier documents

use super::common::{AssociatedDocument, PaymentLine};
use super::documents::{Document, DocumentLookup, DocumentSearch};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::Result;
use crate::types::{flag, Id};
use crate::validate::{Rules, Validate};
use chrono::NaiveDate;
use serde::Serialize;

pub const COUNT: Endpoint = Endpoint::new("receipts", "count");
pub const GET_ALL: Endpoint = Endpoint::new("receipts", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("receipts", "getOne");
pub const INSERT: Endpoint = Endpoint::new("receipts", "insert");
pub const UPDATE: Endpoint = Endpoint::new("receipts", "update");
pub const DELETE: Endpoint = Endpoint::new("receipts", "delete");

pub const ENDPOINTS: &[Endpoint] = &[COUNT, GET_ALL, GET_ONE, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "document_id";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptInsert {
    pub company_id: Id,
    pub date: NaiveDate,
    pub document_set_id: Id,
    pub customer_id: Id,
    pub net_value: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_documents: Vec<AssociatedDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_documents_notes: Option<String>,
    pub payments: Vec<PaymentLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_currency_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        rename = "status",
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed: Option<bool>,
}

impl ReceiptInsert {
    pub fn new(
        company_id: Id,
        date: NaiveDate,
        document_set_id: Id,
        customer_id: Id,
        net_value: f64,
    ) -> Self {
        Self {
            company_id,
            date,
            document_set_id,
            customer_id,
            net_value,
            associated_documents: Vec::new(),
            related_documents_notes: None,
            payments: Vec::new(),
            exchange_currency_id: None,
            exchange_rate: None,
            notes: None,
            closed: None,
        }
    }
}

impl Validate for ReceiptInsert {
    fn validate(&self) -> Result<()> {
        Rules::new("ReceiptInsert")
            .id("company_id", self.company_id)?
            .id("document_set_id", self.document_set_id)?
            .id("customer_id", self.customer_id)?
            .non_negative("net_value", self.net_value)?
            .opt_non_negative("exchange_rate", self.exchange_rate)?
            .non_empty("payments", &self.payments)?
            .each("payments", &self.payments)?
            .each("associated_documents", &self.associated_documents)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptUpdate {
    pub document_id: Id,
    #[serde(flatten)]
    pub receipt: ReceiptInsert,
}

impl Validate for ReceiptUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("ReceiptUpdate").id("document_id", self.document_id)?;
        self.receipt.validate()
    }
}

/// `client.receipts()`
#[derive(Debug, Clone, Copy)]
pub struct Receipts<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn receipts(&self) -> Receipts<'_> {
        Receipts { client: self }
    }
}

impl Receipts<'_> {
    pub async fn count(&self, filter: &DocumentSearch) -> Result<u64> {
        self.client.count(COUNT, filter).await
    }

    pub async fn get_all(&self, filter: &DocumentSearch) -> Result<Vec<Document>> {
        self.client.call(GET_ALL, filter).await
    }

    pub async fn get_all_pages(&self, filter: &DocumentSearch) -> Result<Vec<Document>> {
        self.client.fetch_all(GET_ALL, filter).await
    }

    pub async fn get_one(&self, company_id: Id, document_id: Id) -> Result<Option<Document>> {
        self.client
            .call_optional(GET_ONE, &DocumentLookup::new(company_id, document_id))
            .await
    }

    pub async fn insert(&self, receipt: &ReceiptInsert) -> Result<Id> {
        self.client.mutate(INSERT, receipt, ID_FIELD).await
    }

    pub async fn update(&self, receipt: &ReceiptUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, receipt, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, document_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &DocumentLookup::new(company_id, document_id))
            .await
    }
}
