//! Session/cookie authentication helpers for server-rendered web apps.
//!
//! SYSTEM CONTEXT
//! ==============
//! An [`AuthClient`] signs users in and out, signs them up, fetches CSRF
//! tokens and caches the session, against a backend described by
//! [`AuthConfig`]. The same client runs in two contexts: rendering a request
//! on the server (see [`server::ServerAuth`]) and in the user's page session.
//! Every collaborator (HTTP transport, cookie store, navigator) is a trait so
//! each side plugs in its own.

pub mod actions;
pub mod client;
pub mod config;
pub mod context;
pub mod cookies;
mod csrf;
pub mod error;
pub mod http;
pub mod redirect;
pub mod resolve;
pub mod server;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use actions::{Credentials, GetSessionOptions, SignInOptions, SignOutOptions, SignUpOptions};
pub use client::AuthClient;
pub use config::AuthConfig;
pub use context::{RequestContext, Side};
pub use error::AuthError;
pub use session::{AuthStatus, SessionSnapshot, SessionState};
