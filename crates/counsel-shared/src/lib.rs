//! Shared types for counsel components.
//!
//! Domain records (cases, messages) and the JSON wire types spoken between
//! the daemon and its front end.

pub mod case;
pub mod error;
pub mod message;
pub mod rpc;

pub use case::{Case, CaseId, CaseType};
pub use error::CaseError;
pub use message::{ContentType, Conversation, Message, Role};

/// Crate version, shared by every component
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
