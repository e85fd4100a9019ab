//! Auth actions: sign in, sign out, sign up, fetch the session.
//!
//! Each call runs linearly: ensure CSRF, send the primary request, update the
//! session container, then optionally redirect. Two actions running at once
//! on the same client are not serialized against each other.

mod get_session;
mod sign_in;
mod sign_out;
mod sign_up;

use serde_json::{Map, Value};

/// Transient sign-in/sign-up input, e.g. `email` and `password`.
pub type Credentials = Map<String, Value>;

/// Called by `get_session` when a required session is missing; its return
/// value becomes the call's result.
pub type UnauthenticatedHandler = Box<dyn FnOnce() -> Option<Value> + Send>;

#[derive(Debug, Clone)]
pub struct SignInOptions {
    /// Explicit post-sign-in target.
    pub callback_url: Option<String>,
    /// Navigate after signing in. When false the raw response is returned.
    pub redirect: bool,
    /// Refresh the session container after signing in.
    pub call_get_session: bool,
    /// Extra body fields merged over the credentials.
    pub extra: Map<String, Value>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl Default for SignInOptions {
    fn default() -> Self {
        Self {
            callback_url: None,
            redirect: true,
            call_get_session: true,
            extra: Map::new(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignOutOptions {
    pub callback_url: Option<String>,
    pub redirect: bool,
}

impl Default for SignOutOptions {
    fn default() -> Self {
        Self { callback_url: None, redirect: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpOptions {
    /// Return the sign-up response instead of signing in afterwards.
    pub prevent_login_flow: bool,
    /// Options for the chained sign-in.
    pub sign_in: SignInOptions,
}

#[derive(Default)]
pub struct GetSessionOptions {
    /// A missing session triggers `on_unauthenticated` or a redirect.
    pub required: bool,
    pub callback_url: Option<String>,
    pub on_unauthenticated: Option<UnauthenticatedHandler>,
}

impl GetSessionOptions {
    #[must_use]
    pub fn required() -> Self {
        Self { required: true, ..Self::default() }
    }
}
