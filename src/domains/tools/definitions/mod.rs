//! Tool definitions module.
//!
//! One file per domain, plus the navigation control tools and the helpers
//! they share.

pub mod common;
pub mod companies;
pub mod contacts;
pub mod navigation;
pub mod opportunities;
pub mod products;
pub mod quotes;

pub use common::{NAMESPACE, error_result, json_result, success_result};
pub use companies::CompaniesHandler;
pub use contacts::ContactsHandler;
pub use navigation::{BackTool, NavigateParams, NavigateTool};
pub use opportunities::OpportunitiesHandler;
pub use products::ProductsHandler;
pub use quotes::QuotesHandler;
