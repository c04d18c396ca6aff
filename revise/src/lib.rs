//! `Revise`: project and task boards kept in per-user local storage.
//!
//! A [`session::Session`] loads one identity's [`projects::ProjectStore`]
//! and [`tasks::TaskStore`] over a [`storage::Persistence`] backend. Views
//! are pure projections built by [`board`].

pub mod board;
pub mod cli;
pub mod config;
pub mod projects;
pub mod session;
pub mod storage;
pub mod tasks;
pub mod validation;
