//! Opportunities domain tools.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::common::{self, IdParams, ListParams, RecordRef, UpdateParams};
use crate::core::upstream::SalesBuildrApi;
use crate::domains::navigation::Domain;
use crate::domains::tools::{DomainHandler, ToolError, ToolSpec, Verb};

/// Optional opportunity details shared by create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDetails {
    /// Company the opportunity belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<RecordRef>,

    /// Primary contact for the deal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<RecordRef>,

    /// Expected deal value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<Number>,

    /// Pipeline stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Expected close date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<String>,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameters for creating an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateOpportunityParams {
    /// Opportunity name.
    pub name: String,

    #[serde(flatten)]
    pub details: OpportunityDetails,
}

/// Mutable opportunity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct OpportunityFields {
    /// New opportunity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub details: OpportunityDetails,
}

/// Handler for the opportunities domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpportunitiesHandler;

impl OpportunitiesHandler {
    const DOMAIN: Domain = Domain::Opportunities;
}

#[async_trait]
impl DomainHandler for OpportunitiesHandler {
    fn domain(&self) -> Domain {
        Self::DOMAIN
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new::<ListParams>(
                Verb::List,
                "List sales opportunities. Supports a free-text query plus offset/limit pagination.",
            ),
            ToolSpec::new::<IdParams>(Verb::Get, "Get a single opportunity by id."),
            ToolSpec::new::<CreateOpportunityParams>(
                Verb::Create,
                "Create an opportunity. Requires a name; companyId, amount and stage are optional.",
            ),
            ToolSpec::new::<UpdateParams<OpportunityFields>>(
                Verb::Update,
                "Update an opportunity by id, e.g. to move it to another stage.",
            ),
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
            Verb::Create => {
                common::create::<CreateOpportunityParams>(api, Self::DOMAIN, arguments).await
            }
            Verb::Update => common::update::<OpportunityFields>(api, Self::DOMAIN, arguments).await,
            Verb::Delete => Err(ToolError::unsupported(
                "opportunities cannot be deleted through this server",
            )),
        }
    }
}
