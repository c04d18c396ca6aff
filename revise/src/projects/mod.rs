//! Project collection of one identity.
//!
//! [`ProjectStore`] owns and persists the projects; [`catalog`] is the pure
//! search and sort query behind the project list.

pub mod catalog;
pub mod store;

pub use catalog::{ProjectSort, catalog};
pub use store::ProjectStore;
