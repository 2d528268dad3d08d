//! Companies domain tools.
//!
//! Customer companies are the root record in SalesBuildr: contacts,
//! opportunities and quotes all hang off a company.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{self, IdParams, ListParams, UpdateParams};
use crate::core::upstream::SalesBuildrApi;
use crate::domains::navigation::Domain;
use crate::domains::tools::{DomainHandler, ToolError, ToolSpec, Verb};

/// Optional company details shared by create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    /// Primary e-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Website URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Country name or ISO code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// VAT or tax registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
}

/// Parameters for creating a company.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateCompanyParams {
    /// Company name.
    pub name: String,

    #[serde(flatten)]
    pub details: CompanyDetails,
}

/// Mutable company fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CompanyFields {
    /// New company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub details: CompanyDetails,
}

/// Handler for the companies domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompaniesHandler;

impl CompaniesHandler {
    const DOMAIN: Domain = Domain::Companies;
}

#[async_trait]
impl DomainHandler for CompaniesHandler {
    fn domain(&self) -> Domain {
        Self::DOMAIN
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new::<ListParams>(
                Verb::List,
                "List companies. Supports a free-text query plus offset/limit pagination.",
            ),
            ToolSpec::new::<IdParams>(Verb::Get, "Get a single company by id."),
            ToolSpec::new::<CreateCompanyParams>(
                Verb::Create,
                "Create a company. Requires a name; contact and address details are optional.",
            ),
            ToolSpec::new::<UpdateParams<CompanyFields>>(
                Verb::Update,
                "Update a company by id. Only the fields provided are changed.",
            ),
            ToolSpec::new::<IdParams>(Verb::Delete, "Delete a company by id."),
        ]
    }

    async fn execute(
        &self,
        verb: Verb,
        arguments: JsonObject,
        api: &dyn SalesBuildrApi,
    ) -> Result<Value, ToolError> {
        match verb {
            Verb::List => common::list(api, Self::DOMAIN, arguments).await,
            Verb::Get => common::get(api, Self::DOMAIN, arguments).await,
            Verb::Create => common::create::<CreateCompanyParams>(api, Self::DOMAIN, arguments).await,
            Verb::Update => common::update::<CompanyFields>(api, Self::DOMAIN, arguments).await,
            Verb::Delete => common::delete(api, Self::DOMAIN, arguments).await,
        }
    }
}
