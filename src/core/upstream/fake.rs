//! In-memory SalesBuildr API used by tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::accessor::ClientFactory;
use super::client::{Credentials, ListQuery, SalesBuildrApi};
use super::error::{UpstreamError, UpstreamResult};
use crate::domains::navigation::Domain;

/// A call received by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List(Domain, ListQuery),
    Get(Domain, String),
    Create(Domain, Value),
    Update(Domain, String, Value),
    Delete(Domain, String),
}

/// Records every call and answers with canned data, or fails on demand.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    failure: Option<(u16, String)>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// An API whose every call fails with `status` and `message`.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some((status, message.to_string())),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall, response: Value) -> UpstreamResult<Value> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some((status, message)) => Err(UpstreamError::status(*status, message.clone())),
            None => Ok(response),
        }
    }
}

#[async_trait]
impl SalesBuildrApi for RecordingApi {
    async fn list(&self, domain: Domain, query: &ListQuery) -> UpstreamResult<Value> {
        self.record(
            ApiCall::List(domain, query.clone()),
            json!({"items": [], "total": 0}),
        )
    }

    async fn get(&self, domain: Domain, id: &str) -> UpstreamResult<Value> {
        self.record(ApiCall::Get(domain, id.to_string()), json!({"id": id}))
    }

    async fn create(&self, domain: Domain, payload: Value) -> UpstreamResult<Value> {
        let mut created = payload.clone();
        if let Value::Object(map) = &mut created {
            map.insert("id".to_string(), json!("generated-1"));
        }
        self.record(ApiCall::Create(domain, payload), created)
    }

    async fn update(&self, domain: Domain, id: &str, payload: Value) -> UpstreamResult<Value> {
        self.record(
            ApiCall::Update(domain, id.to_string(), payload.clone()),
            payload,
        )
    }

    async fn delete(&self, domain: Domain, id: &str) -> UpstreamResult<Value> {
        self.record(ApiCall::Delete(domain, id.to_string()), Value::Null)
    }
}

/// Factory handing out one shared [`RecordingApi`] and remembering the keys
/// it was asked to build with.
pub struct FakeClientFactory {
    api: Arc<RecordingApi>,
    built: Mutex<Vec<String>>,
}

impl FakeClientFactory {
    pub fn new(api: Arc<RecordingApi>) -> Self {
        Self {
            api,
            built: Mutex::new(Vec::new()),
        }
    }

    pub fn built_keys(&self) -> Vec<String> {
        self.built.lock().unwrap().clone()
    }
}

impl ClientFactory for FakeClientFactory {
    fn build(&self, credentials: &Credentials) -> Result<Arc<dyn SalesBuildrApi>, UpstreamError> {
        self.built.lock().unwrap().push(credentials.api_key.clone());
        Ok(self.api.clone())
    }
}
