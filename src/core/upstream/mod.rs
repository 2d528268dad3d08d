//! Upstream SalesBuildr API access.
//!
//! - `client`: the [`SalesBuildrApi`] trait and its `reqwest` implementation
//! - `accessor`: lazily built, rebindable handles and per-tenant scoping
//! - `error`: upstream and client construction errors

mod accessor;
mod client;
mod error;

#[cfg(test)]
pub(crate) mod fake;

pub use accessor::{ClientAccessor, ClientFactory, ClientScope, HttpClientFactory};
pub use client::{
    API_KEY_HEADER, Credentials, HttpSalesBuildrClient, ListQuery, SalesBuildrApi, resource_path,
};
pub use error::{ClientError, UpstreamError, UpstreamResult};
