//! Task collection of one identity.

pub mod store;

pub use store::TaskStore;
