//! Provider-facing configuration (data) and identity mappers (behavior).
//!
//! `config` exposes the validated [`ProviderConfig`] consumed read-only by the callback
//! state machine: token endpoint, client credentials, and the `store_token` flag.
//! `mapper` defines [`IdentityMapper`], the per-provider strategy that turns a raw token
//! endpoint response into an [`IdentityProfile`](crate::auth::IdentityProfile), plus the
//! JSON-driven default implementation and its email policy.

pub mod config;
pub mod mapper;

pub use config::*;
pub use mapper::*;
