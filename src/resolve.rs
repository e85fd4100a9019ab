//! API URL resolution.
//!
//! The base URL may be overridden at runtime by an environment variable, but
//! only on the server: the browser has no process environment. In path-only
//! mode (the default unless internal routing is disabled) the base is reduced
//! to its path so requests stay on the app's own origin.
//!
//! `is_external_url` is a prefix check on developer-supplied config, not a
//! URL validator.

use url::Url;

use crate::config::AuthConfig;
use crate::context::Side;

/// True if `url` starts with an `http://` or `https://` scheme.
#[must_use]
pub fn is_external_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Effective API base URL.
///
/// `return_only_pathname = None` means path-only unless
/// `disable_internal_routing` is set.
#[must_use]
pub fn resolve_api_base_url(config: &AuthConfig, side: Side, return_only_pathname: Option<bool>) -> String {
    let only_pathname = return_only_pathname.unwrap_or(!config.disable_internal_routing);
    let base = origin_override(config, side).unwrap_or_else(|| config.base_url.clone());

    if only_pathname { pathname(&base) } else { base }
}

/// Full request URL for an endpoint path. Absolute endpoint URLs are returned
/// as-is so they are never prefixed twice.
#[must_use]
pub fn resolve_api_url_path(endpoint_path: &str, config: &AuthConfig, side: Side) -> String {
    if is_external_url(endpoint_path) {
        return endpoint_path.to_owned();
    }
    join_url(&resolve_api_base_url(config, side, None), endpoint_path)
}

/// Join two URL segments with exactly one `/` between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_owned();
    }
    format!("{}/{path}", base.trim_end_matches('/'))
}

/// Value of query parameter `name` in a relative or absolute URL.
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = Url::parse(url).or_else(|_| Url::parse("http://localhost").and_then(|base| base.join(url))).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// True if `target` leaves the origin of `current`. Relative targets never do.
#[must_use]
pub fn is_off_origin(target: &str, current: &str) -> bool {
    if !is_external_url(target) {
        return false;
    }
    match (Url::parse(target), Url::parse(current)) {
        (Ok(target), Ok(current)) => target.origin() != current.origin(),
        _ => true,
    }
}

fn origin_override(config: &AuthConfig, side: Side) -> Option<String> {
    if side != Side::Server {
        return None;
    }
    let key = config.origin_env_key.as_deref()?;
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn pathname(base: &str) -> String {
    let path = match Url::parse(base) {
        Ok(url) => url.path().to_owned(),
        Err(_) => base.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    if path.starts_with('/') { path } else { format!("/{path}") }
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
