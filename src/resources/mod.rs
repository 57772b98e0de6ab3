//! Endpoint catalog and per-resource handles
//!
//! Each submodule binds one Moloni resource: its request/response models,
//! its endpoint constants, and a handle borrowed from [`MoloniClient`]
//! (`client.customers().get_all(..)`).
//!
//! [`MoloniClient`]: crate::client::MoloniClient

use crate::error::{Error, Result};
use crate::template::{self, TemplateContext};
use std::fmt;

pub mod common;

pub mod companies;
pub mod customer_alternate_addresses;
pub mod customers;
pub mod document_sets;
pub mod documents;
pub mod global_data;
pub mod invoices;
pub mod maturity_dates;
pub mod measurement_units;
pub mod payment_methods;
pub mod product_categories;
pub mod products;
pub mod receipts;
pub mod suppliers;
pub mod taxes;
pub mod warehouses;

/// One bound API operation: `/{version}/{resource}/{action}/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub resource: &'static str,
    pub action: &'static str,
}

impl Endpoint {
    pub const fn new(resource: &'static str, action: &'static str) -> Self {
        Self { resource, action }
    }

    /// Path template with a version placeholder
    pub fn template(&self) -> String {
        format!("{{{{ version }}}}/{}/{}/", self.resource, self.action)
    }

    /// Rendered path for an API version, e.g. `v1/customers/getAll/`
    pub fn path(&self, version: &str) -> Result<String> {
        template::render(&self.template(), &TemplateContext::with_version(version))
    }

    /// True for actions that never change records.
    ///
    /// Only these are resent after a 5xx or a timeout.
    pub fn is_read_only(&self) -> bool {
        !matches!(self.action, "insert" | "update" | "delete")
    }

    /// `resource/action`, used in logs and errors
    pub fn name(&self) -> String {
        format!("{}/{}", self.resource, self.action)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.action)
    }
}

/// Every endpoint this crate binds
pub fn all_endpoints() -> Vec<Endpoint> {
    [
        companies::ENDPOINTS,
        customers::ENDPOINTS,
        customer_alternate_addresses::ENDPOINTS,
        suppliers::ENDPOINTS,
        products::ENDPOINTS,
        product_categories::ENDPOINTS,
        invoices::ENDPOINTS,
        receipts::ENDPOINTS,
        documents::ENDPOINTS,
        taxes::ENDPOINTS,
        warehouses::ENDPOINTS,
        payment_methods::ENDPOINTS,
        maturity_dates::ENDPOINTS,
        document_sets::ENDPOINTS,
        measurement_units::ENDPOINTS,
        global_data::ENDPOINTS,
    ]
    .concat()
}

/// Look up an endpoint by resource and action (ASCII case-insensitive)
pub fn find_endpoint(resource: &str, action: &str) -> Option<Endpoint> {
    all_endpoints().into_iter().find(|e| {
        e.resource.eq_ignore_ascii_case(resource) && e.action.eq_ignore_ascii_case(action)
    })
}

/// Like [`find_endpoint`], but unknown pairs are an error
pub fn resolve_endpoint(resource: &str, action: &str) -> Result<Endpoint> {
    find_endpoint(resource, action).ok_or_else(|| Error::UnknownEndpoint {
        resource: resource.to_string(),
        action: action.to_string(),
    })
}

/// Distinct resource names, in catalog order
pub fn resource_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for endpoint in all_endpoints() {
        if !names.contains(&endpoint.resource) {
            names.push(endpoint.resource);
        }
    }
    names
}
