//! Products domain tools.
//!
//! The catalog is read-only through this server.

use async_trait::async_trait;
use rmcp::model::JsonObject;
use serde_json::Value;

use super::common::{self, IdParams, ListParams};
use crate::core::upstream::SalesBuildrApi;
use crate::domains::navigation::Domain;
use crate::domains::tools::{DomainHandler, ToolError, ToolSpec, Verb};

/// Handler for the products domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductsHandler;

impl ProductsHandler {
    const DOMAIN: Domain = Domain::Products;
}

#[async_trait]
impl DomainHandler for ProductsHandler {
    fn domain(&self) -> Domain {
        Self::DOMAIN
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new::<ListParams>(
                Verb::List,
                "Search the product catalog by name or SKU, with offset/limit pagination. Use the returned ids as productId on quote items.",
            ),
            ToolSpec::new::<IdParams>(Verb::Get, "Get a single product by id, including pricing."),
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
            Verb::Create | Verb::Update | Verb::Delete => Err(ToolError::unsupported(format!(
                "products cannot be {}d through this server",
                verb
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::fake::{ApiCall, RecordingApi};
    use crate::domains::tools::definitions::common::tests::args;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_product() {
        let api = RecordingApi::new();
        let result = ProductsHandler
            .execute(Verb::Get, args(json!({"id": "sku-1"})), &api)
            .await
            .unwrap();
        assert_eq!(result, json!({"id": "sku-1"}));
        assert_eq!(
            api.calls(),
            vec![ApiCall::Get(Domain::Products, "sku-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_write_verbs_are_unsupported() {
        let api = RecordingApi::new();
        let err = ProductsHandler
            .execute(Verb::Delete, args(json!({"id": "sku-1"})), &api)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Unsupported(_)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_only_read_tools_exposed() {
        let verbs: Vec<_> = ProductsHandler.tools().iter().map(|t| t.verb).collect();
        assert_eq!(verbs, vec![Verb::List, Verb::Get]);
    }
}
