//! Navigation domain.
//!
//! Holds the decision-tree state that controls which tools a session can
//! see: the closed set of [`Domain`]s, the [`NavigationState`] machine and
//! the per-connection [`Session`] wrapper around it.

mod domain;
mod session;
mod state;

pub use domain::Domain;
pub use session::Session;
pub use state::{NavigationState, Transition};
