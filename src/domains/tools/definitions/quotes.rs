//! Quotes domain tools.
//!
//! Quotes are created together with their line items in a single call.
//! Numeric amounts are forwarded exactly as the caller wrote them.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::common::{self, IdParams, ListParams, RecordRef};
use crate::core::upstream::SalesBuildrApi;
use crate::domains::navigation::Domain;
use crate::domains::tools::{DomainHandler, ToolError, ToolSpec, Verb};

/// One line on a quote.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    /// Line item name.
    pub name: String,

    /// Quantity.
    #[schemars(with = "f64")]
    pub quantity: Number,

    /// Price per unit.
    #[schemars(with = "f64")]
    pub unit_price: Number,

    /// Catalog product this line refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<RecordRef>,

    /// Line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Recurring price per billing cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub recurring_price: Option<Number>,

    /// Billing cycle for the recurring price (e.g. monthly, yearly).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<String>,

    /// Discount percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub discount: Option<Number>,
}

/// Parameters for creating a quote.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteParams {
    /// Quote title.
    pub title: String,

    /// Company the quote is addressed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<RecordRef>,

    /// Contact the quote is addressed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<RecordRef>,

    /// Opportunity this quote belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<RecordRef>,

    /// ISO currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Expiry date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,

    /// Line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<QuoteItem>>,
}

/// Handler for the quotes domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuotesHandler;

impl QuotesHandler {
    const DOMAIN: Domain = Domain::Quotes;
}

#[async_trait]
impl DomainHandler for QuotesHandler {
    fn domain(&self) -> Domain {
        Self::DOMAIN
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new::<ListParams>(
                Verb::List,
                "List quotes. Supports a free-text query plus offset/limit pagination.",
            ),
            ToolSpec::new::<IdParams>(Verb::Get, "Get a single quote by id, including its line items."),
            ToolSpec::new::<CreateQuoteParams>(
                Verb::Create,
                "Create a quote. Requires a title; items each need name, quantity and unitPrice.",
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
            Verb::Create => common::create::<CreateQuoteParams>(api, Self::DOMAIN, arguments).await,
            Verb::Update | Verb::Delete => Err(ToolError::unsupported(format!(
                "quotes cannot be {}d through this server",
                verb
            ))),
        }
    }
}
