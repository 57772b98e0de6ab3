//! Invoices

use super::common::{AssociatedDocument, PaymentLine, ProductLine};
use super::documents::{Document, DocumentLookup, DocumentSearch};
use super::Endpoint;
use crate::client::MoloniClient;
use crate::error::{Error, Result};
use crate::types::{flag, Id};
use crate::validate::{Rules, Validate};
use chrono::NaiveDate;
use serde::Serialize;

pub const COUNT: Endpoint = Endpoint::new("invoices", "count");
pub const GET_ALL: Endpoint = Endpoint::new("invoices", "getAll");
pub const GET_ONE: Endpoint = Endpoint::new("invoices", "getOne");
pub const INSERT: Endpoint = Endpoint::new("invoices", "insert");
pub const UPDATE: Endpoint = Endpoint::new("invoices", "update");
pub const DELETE: Endpoint = Endpoint::new("invoices", "delete");

pub const ENDPOINTS: &[Endpoint] = &[COUNT, GET_ALL, GET_ONE, INSERT, UPDATE, DELETE];

const ID_FIELD: &str = "document_id";

/// Parameters of `invoices/insert`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceInsert {
    pub company_id: Id,
    pub date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub document_set_id: Id,
    pub customer_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_address_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eac_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesman_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesman_commission: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_discount: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_documents: Vec<AssociatedDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_documents_notes: Option<String>,
    pub products: Vec<ProductLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<PaymentLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_currency_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Closed (`1`) or draft (`0`)
    #[serde(
        rename = "status",
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed: Option<bool>,
}

impl InvoiceInsert {
    pub fn new(
        company_id: Id,
        date: NaiveDate,
        expiration_date: NaiveDate,
        document_set_id: Id,
        customer_id: Id,
    ) -> Self {
        Self {
            company_id,
            date,
            expiration_date,
            document_set_id,
            customer_id,
            alternate_address_id: None,
            our_reference: None,
            your_reference: None,
            financial_discount: None,
            eac_id: None,
            salesman_id: None,
            salesman_commission: None,
            special_discount: None,
            associated_documents: Vec::new(),
            related_documents_notes: None,
            products: Vec::new(),
            payments: Vec::new(),
            exchange_currency_id: None,
            exchange_rate: None,
            delivery_method_id: None,
            notes: None,
            closed: None,
        }
    }
}

impl Validate for InvoiceInsert {
    fn validate(&self) -> Result<()> {
        let rules = Rules::new("InvoiceInsert");
        rules
            .id("company_id", self.company_id)?
            .id("document_set_id", self.document_set_id)?
            .id("customer_id", self.customer_id)?
            .opt_id("alternate_address_id", self.alternate_address_id)?
            .opt_id("salesman_id", self.salesman_id)?
            .percent("financial_discount", self.financial_discount)?
            .percent("special_discount", self.special_discount)?
            .percent("salesman_commission", self.salesman_commission)?
            .opt_non_negative("exchange_rate", self.exchange_rate)?
            .non_empty("products", &self.products)?
            .each("products", &self.products)?
            .each("payments", &self.payments)?
            .each("associated_documents", &self.associated_documents)?;
        if self.expiration_date < self.date {
            return Err(Error::validation(
                "InvoiceInsert",
                "expiration_date",
                "must not be before date",
            ));
        }
        Ok(())
    }
}

/// Parameters of `invoices/update`; only drafts can be updated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceUpdate {
    pub document_id: Id,
    #[serde(flatten)]
    pub invoice: InvoiceInsert,
}

impl Validate for InvoiceUpdate {
    fn validate(&self) -> Result<()> {
        Rules::new("InvoiceUpdate").id("document_id", self.document_id)?;
        self.invoice.validate()
    }
}

/// `client.invoices()`
#[derive(Debug, Clone, Copy)]
pub struct Invoices<'a> {
    client: &'a MoloniClient,
}

impl MoloniClient {
    pub fn invoices(&self) -> Invoices<'_> {
        Invoices { client: self }
    }
}

impl Invoices<'_> {
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

    /// Returns the new `document_id`
    pub async fn insert(&self, invoice: &InvoiceInsert) -> Result<Id> {
        self.client.mutate(INSERT, invoice, ID_FIELD).await
    }

    pub async fn update(&self, invoice: &InvoiceUpdate) -> Result<Id> {
        self.client.mutate(UPDATE, invoice, ID_FIELD).await
    }

    pub async fn delete(&self, company_id: Id, document_id: Id) -> Result<()> {
        self.client
            .delete(DELETE, &DocumentLookup::new(company_id, document_id))
            .await
    }
}
