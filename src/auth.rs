//! Identifiers, secrets, and the identity records produced by a callback.

pub mod id;
pub mod identity;
pub mod secret;

pub use id::*;
pub use identity::*;
pub use secret::*;
