//! counseld library - exposes modules for testing.

pub mod auth;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod replies;
pub mod routes;
pub mod server;
pub mod store;
