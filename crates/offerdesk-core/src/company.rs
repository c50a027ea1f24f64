//! # Companies
//!
//! Customer and supplier records, and the customer block copied onto an
//! offer when a company is picked.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether a company buys from us or sells to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CompanyKind {
    #[default]
    Customer,
    Supplier,
}

/// A company/contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: CompanyKind,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub contact_email: String,
}

/// Customer details as they appear on an offer.
///
/// A snapshot: editing the company afterwards does not change offers
/// already written for it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub address: String,
}

impl CustomerRef {
    /// A customer typed in by hand, not picked from the company list.
    pub fn named(name: impl Into<String>) -> Self {
        CustomerRef {
            name: name.into(),
            ..CustomerRef::default()
        }
    }
}

impl From<&Company> for CustomerRef {
    fn from(company: &Company) -> Self {
        CustomerRef {
            name: company.name.clone(),
            contact_person: company.contact_person.clone(),
            address: company.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_ref_from_company() {
        let company = Company {
            id: "c1".to_string(),
            name: "Soma Enerji".to_string(),
            kind: CompanyKind::Customer,
            address: "Sanayi Sok. 22/A".to_string(),
            contact_person: "Ayşe Demir".to_string(),
            contact_email: "ayse@example.com".to_string(),
        };

        let customer = CustomerRef::from(&company);
        assert_eq!(customer.name, "Soma Enerji");
        assert_eq!(customer.contact_person, "Ayşe Demir");
        assert_eq!(customer.address, "Sanayi Sok. 22/A");
    }

    #[test]
    fn test_company_kind_defaults_to_customer() {
        let company: Company = serde_json::from_str(r#"{"id":"c2","name":"Acme"}"#).unwrap();
        assert_eq!(company.kind, CompanyKind::Customer);
    }
}
