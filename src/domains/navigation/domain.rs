//! Domain identifiers.
//!
//! A domain is a bounded group of SalesBuildr operations exposed together as
//! a set of tools. The set is closed: anything the navigation tool accepts is
//! one of these variants, so an unregistered domain cannot be constructed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A navigable group of SalesBuildr tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Companies,
    Contacts,
    Products,
    Opportunities,
    Quotes,
}

impl Domain {
    /// Every domain, in the order it is presented to clients.
    pub const ALL: [Domain; 5] = [
        Domain::Companies,
        Domain::Contacts,
        Domain::Products,
        Domain::Opportunities,
        Domain::Quotes,
    ];

    /// Identifier used in tool names and navigation arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Companies => "companies",
            Domain::Contacts => "contacts",
            Domain::Products => "products",
            Domain::Opportunities => "opportunities",
            Domain::Quotes => "quotes",
        }
    }

    /// Human-readable summary shown in the navigation tool description.
    pub fn description(self) -> &'static str {
        match self {
            Domain::Companies => "Manage customer companies (list, get, create, update, delete)",
            Domain::Contacts => "Manage contacts at customer companies (list, get, create, update, delete)",
            Domain::Products => "Browse the product catalog (list, get)",
            Domain::Opportunities => "Track sales opportunities (list, get, create, update)",
            Domain::Quotes => "Build and review quotes with line items (list, get, create)",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_identifiers_are_unique() {
        let mut names: Vec<_> = Domain::ALL.iter().map(|d| d.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Domain::ALL.len());
    }

    #[test]
    fn test_domain_serde_matches_identifier() {
        for domain in Domain::ALL {
            let json = serde_json::to_value(domain).unwrap();
            assert_eq!(json, serde_json::json!(domain.as_str()));
            let parsed: Domain = serde_json::from_value(json).unwrap();
            assert_eq!(parsed, domain);
        }
    }

    #[test]
    fn test_unknown_domain_is_rejected() {
        let parsed: Result<Domain, _> = serde_json::from_str(r#""invoices""#);
        assert!(parsed.is_err());
    }
}
