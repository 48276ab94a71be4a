//! Common types, protocol definitions, and errors shared across `agora-rest-svc` crates.

pub mod error;
pub mod protocol;

pub use error::DispatchError;
pub use protocol::{Cookie, ResponseContent, ResponseStatus};
