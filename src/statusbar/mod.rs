//! Status-bar item providers and their registry.
//!
//! Providers contribute items for a (document, cell) pair, scoped to a view
//! type. The [`StatusBarService`] keeps the registered providers, gathers
//! items from every matching provider concurrently, and broadcasts change
//! events so the host can re-render when the contribution set moves.

mod provider;
mod service;

pub use provider::{StatusBarAlignment, StatusBarItem, StatusBarItemList, StatusBarItemProvider};
pub use service::StatusBarService;
