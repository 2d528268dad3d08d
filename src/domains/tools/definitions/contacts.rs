//! Contacts domain tools.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{self, IdParams, ListParams, RecordRef, UpdateParams};
use crate::core::upstream::SalesBuildrApi;
use crate::domains::navigation::Domain;
use crate::domains::tools::{DomainHandler, ToolError, ToolSpec, Verb};

/// Optional contact details shared by create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// E-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Job title or role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// Company the contact works for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<RecordRef>,
}

/// Parameters for creating a contact.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactParams {
    /// Given name.
    pub first_name: String,

    #[serde(flatten)]
    pub details: ContactDetails,
}

/// Mutable contact fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(flatten)]
    pub details: ContactDetails,
}

/// Handler for the contacts domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContactsHandler;

impl ContactsHandler {
    const DOMAIN: Domain = Domain::Contacts;
}

#[async_trait]
impl DomainHandler for ContactsHandler {
    fn domain(&self) -> Domain {
        Self::DOMAIN
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new::<ListParams>(
                Verb::List,
                "List contacts. Supports a free-text query plus offset/limit pagination.",
            ),
            ToolSpec::new::<IdParams>(Verb::Get, "Get a single contact by id."),
            ToolSpec::new::<CreateContactParams>(
                Verb::Create,
                "Create a contact. Requires firstName; link it to a company with companyId.",
            ),
            ToolSpec::new::<UpdateParams<ContactFields>>(
                Verb::Update,
                "Update a contact by id. Only the fields provided are changed.",
            ),
            ToolSpec::new::<IdParams>(Verb::Delete, "Delete a contact by id."),
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
            Verb::Create => common::create::<CreateContactParams>(api, Self::DOMAIN, arguments).await,
            Verb::Update => common::update::<ContactFields>(api, Self::DOMAIN, arguments).await,
            Verb::Delete => common::delete(api, Self::DOMAIN, arguments).await,
        }
    }
}
