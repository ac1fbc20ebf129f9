//! Wire types for the invite service: the request envelope, procedures and their
//! bodies and replies, and the error shape returned to callers.

#[macro_use]
extern crate serde;

pub mod auth;
pub mod error;
pub mod procedure;
pub mod reply;
pub mod request;

pub use auth::Authorization;
pub use procedure::Procedure;
pub use request::{RpcRequest, RpcResponse};
