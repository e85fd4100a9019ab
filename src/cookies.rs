//! Cookie store: the ambient cookie jar the auth actions read on every access.
//!
//! SYSTEM CONTEXT
//! ==============
//! On the server the store is seeded from the incoming `Cookie` header and
//! its contents are forwarded on every backend call, because server-side
//! fetches do not inherit the browser's cookies. Every `Set-Cookie` the
//! backend returns is applied here and also queued, so the server can pass it
//! on to the browser with the rendered response.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

/// Ambient cookie access. Reads are never cached by callers.
///
/// In the browser the backend's cookies live in the document, not in the
/// client: browser requests carry no `Cookie` header of their own, so a
/// browser implementation must read and write `document.cookie`.
pub trait CookieStore: Send + Sync {
    /// Current value of cookie `name`.
    fn get(&self, name: &str) -> Option<String>;

    /// `Cookie` request header carrying every stored cookie.
    fn header(&self) -> Option<String>;

    /// Apply one `Set-Cookie` header value from a backend response.
    fn apply_set_cookie(&self, raw: &str);

    /// Drop cookie `name` and queue an expiring `Set-Cookie` for it.
    fn remove(&self, name: &str);
}

/// In-memory jar for the server side, one per incoming request.
///
/// Not suitable for browser clients: cookies recorded here are never sent
/// back from the browser context.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    values: Mutex<BTreeMap<String, String>>,
    outgoing: Mutex<Vec<String>>,
}

impl MemoryCookieStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the `Cookie` header of an incoming request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let jar = CookieJar::from_headers(headers);
        let values = jar
            .iter()
            .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned()))
            .collect();
        Self { values: Mutex::new(values), outgoing: Mutex::default() }
    }

    /// Insert a cookie directly, without queueing a `Set-Cookie`.
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }

    /// `Set-Cookie` header values applied since the last call, oldest first.
    #[must_use]
    pub fn take_set_cookies(&self) -> Vec<String> {
        std::mem::take(&mut *self.outgoing.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn queue(&self, raw: String) {
        self.outgoing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(raw);
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn header(&self) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        if values.is_empty() {
            return None;
        }
        let pairs: Vec<String> = values.iter().map(|(name, value)| format!("{name}={value}")).collect();
        Some(pairs.join("; "))
    }

    fn apply_set_cookie(&self, raw: &str) {
        let cookie = match Cookie::parse(raw.to_owned()) {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed set-cookie header");
                return;
            }
        };

        {
            let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
            if is_expired(&cookie) {
                values.remove(cookie.name());
            } else {
                values.insert(cookie.name().to_owned(), cookie.value().to_owned());
            }
        }
        self.queue(raw.to_owned());
    }

    fn remove(&self, name: &str) {
        let removed = self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        if removed.is_some() {
            let expired = Cookie::build((name.to_owned(), ""))
                .path("/")
                .max_age(Duration::ZERO)
                .build();
            self.queue(expired.to_string());
        }
    }
}

fn is_expired(cookie: &Cookie<'_>) -> bool {
    if cookie.max_age().is_some_and(|max_age| max_age <= Duration::ZERO) {
        return true;
    }
    cookie
        .expires_datetime()
        .is_some_and(|expires| expires <= OffsetDateTime::now_utc())
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
