//! Common utilities shared across domain tools.
//!
//! Argument parsing, shared parameter shapes (list, by-id), the CRUD calls
//! every domain forwards to, and envelope construction.

use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::core::upstream::{ListQuery, SalesBuildrApi};
use crate::domains::navigation::Domain;
use crate::domains::tools::ToolError;

/// Prefix shared by every tool name.
pub const NAMESPACE: &str = "salesbuildr";

/// Page size used when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 25;

/// Largest page size the upstream accepts.
pub const MAX_LIMIT: u32 = 100;

/// Default limit for list results.
pub fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Validate and clamp limit to allowed range (1-100).
pub fn validate_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIMIT)
}

/// Parameters accepted by every `list` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListParams {
    /// Free-text search query.
    #[serde(default)]
    pub query: Option<String>,

    /// Number of records to skip.
    #[serde(default)]
    pub offset: Option<u32>,

    /// Page size (default: 25, max: 100).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ListParams {
    /// Upstream query for these parameters.
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            search: self
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            from: self.offset,
            size: Some(validate_limit(self.limit)),
        }
    }
}

/// Parameters for tools addressing one record.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IdParams {
    /// Identifier of the record.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

/// Accept an identifier given either as a string or as an integer.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(u64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        RawId::Text(_) => Err(D::Error::custom("id must not be empty")),
        RawId::Integer(n) => Ok(n.to_string()),
    }
}

/// Reference to another record, forwarded in the form the caller sent it.
///
/// List results carry numeric ids, so both integers and strings are
/// accepted wherever one record points at another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RecordRef {
    Integer(u64),
    Text(String),
}

/// Deserialize a tool's argument bag.
pub fn parse_params<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Serialize typed fields into an upstream payload object without `id`.
///
/// The upstream owns resource identity: a caller-supplied `id` is never
/// forwarded in a create or update body.
pub fn payload<T: Serialize>(fields: &T) -> Result<Value, ToolError> {
    let mut value =
        serde_json::to_value(fields).map_err(|e| ToolError::internal(e.to_string()))?;
    match &mut value {
        Value::Object(map) => {
            map.remove("id");
        }
        _ => return Err(ToolError::internal("payload must serialize to an object")),
    }
    Ok(value)
}

// ============================================================================
// CRUD forwarding
// ============================================================================

pub async fn list(
    api: &dyn SalesBuildrApi,
    domain: Domain,
    arguments: JsonObject,
) -> Result<Value, ToolError> {
    let params: ListParams = parse_params(arguments)?;
    Ok(api.list(domain, &params.to_query()).await?)
}

pub async fn get(
    api: &dyn SalesBuildrApi,
    domain: Domain,
    arguments: JsonObject,
) -> Result<Value, ToolError> {
    let params: IdParams = parse_params(arguments)?;
    Ok(api.get(domain, &params.id).await?)
}

/// Forward a create. `P` never carries an `id`, and [`payload`] strips one
/// regardless.
pub async fn create<P>(
    api: &dyn SalesBuildrApi,
    domain: Domain,
    arguments: JsonObject,
) -> Result<Value, ToolError>
where
    P: DeserializeOwned + Serialize,
{
    let params: P = parse_params(arguments)?;
    Ok(api.create(domain, payload(&params)?).await?)
}

/// Forward an update, routing the identifier separately from the fields.
pub async fn update<F>(
    api: &dyn SalesBuildrApi,
    domain: Domain,
    arguments: JsonObject,
) -> Result<Value, ToolError>
where
    F: DeserializeOwned + Serialize,
{
    let UpdateParams { id, fields } = parse_params::<UpdateParams<F>>(arguments)?;
    let body = payload(&fields)?;
    if body.as_object().is_some_and(|map| map.is_empty()) {
        return Err(ToolError::invalid_arguments(
            "update requires at least one field besides id",
        ));
    }
    Ok(api.update(domain, &id, body).await?)
}

pub async fn delete(
    api: &dyn SalesBuildrApi,
    domain: Domain,
    arguments: JsonObject,
) -> Result<Value, ToolError> {
    let params: IdParams = parse_params(arguments)?;
    let response = api.delete(domain, &params.id).await?;
    Ok(match response {
        Value::Null => json!({ "deleted": true, "id": params.id }),
        other => other,
    })
}

/// Update arguments: the identifier plus the domain's mutable fields.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateParams<F> {
    /// Identifier of the record to update.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(flatten)]
    pub fields: F,
}

// ============================================================================
// Envelopes
// ============================================================================

/// Create a success result with text content. `isError` is left unset.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(content)],
        structured_content: None,
        is_error: None,
        meta: None,
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Render an upstream response as the text of a success envelope.
pub fn json_result(value: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    success_result(text)
}
