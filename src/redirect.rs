//! Cross-context redirects.
//!
//! ARCHITECTURE
//! ============
//! On the server a redirect is a `302 Found` on the in-flight response; the
//! browser APIs do not exist there. In the browser, external targets (pages
//! the client router does not know) need a real location change. That change
//! is raced against a timer: if the page has not started unloading by then,
//! we fall back to the router's own push navigation, which may log a router
//! warning but does not leave the user stuck. The timer belongs to the
//! window, since tokio's timers are not available on `wasm32-unknown-unknown`.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use crate::error::AuthError;

/// Navigate to a URL in the current execution context.
#[async_trait::async_trait]
pub trait Navigator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AuthError::Navigation`] if the target cannot be reached.
    async fn navigate(&self, url: &str, external: bool) -> Result<(), AuthError>;
}

// =============================================================================
// SERVER
// =============================================================================

/// Records the redirect for the response being rendered. The last navigation
/// wins.
#[derive(Debug, Default)]
pub struct ServerNavigator {
    location: Mutex<Option<String>>,
}

impl ServerNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consume the pending redirect as a `302 Found` response.
    #[must_use]
    pub fn take_response(&self) -> Option<Response> {
        let location = self
            .location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        Some(found(&location))
    }
}

#[async_trait::async_trait]
impl Navigator for ServerNavigator {
    async fn navigate(&self, url: &str, _external: bool) -> Result<(), AuthError> {
        tracing::debug!(%url, "server redirect");
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.to_owned());
        Ok(())
    }
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_owned())]).into_response()
}

// =============================================================================
// BROWSER
// =============================================================================

/// The browser window and client-side router.
#[async_trait::async_trait]
pub trait BrowserWindow: Send + Sync {
    /// Set `window.location` to `url`.
    fn set_location(&self, url: &str) -> Result<(), AuthError>;

    /// Force a full reload of the current location.
    fn reload(&self) -> Result<(), AuthError>;

    /// Resolves once the document starts unloading.
    async fn unloading(&self);

    /// Resolves after `duration`, using the host's timer.
    async fn wait(&self, duration: Duration);

    /// Navigate through the client-side router.
    async fn push_route(&self, url: &str) -> Result<(), AuthError>;
}

pub struct BrowserNavigator<W> {
    window: W,
    fallback_after: Duration,
}

impl<W: BrowserWindow> BrowserNavigator<W> {
    #[must_use]
    pub fn new(window: W, fallback_after: Duration) -> Self {
        Self { window, fallback_after }
    }

    #[must_use]
    pub fn window(&self) -> &W {
        &self.window
    }
}

#[async_trait::async_trait]
impl<W: BrowserWindow> Navigator for BrowserNavigator<W> {
    async fn navigate(&self, url: &str, external: bool) -> Result<(), AuthError> {
        if !external {
            return self.window.push_route(url).await;
        }

        self.window.set_location(url)?;
        // Fragment-only changes do not reload on their own.
        if url.contains('#') {
            self.window.reload()?;
        }

        tokio::select! {
            () = self.window.unloading() => Ok(()),
            () = self.window.wait(self.fallback_after) => {
                tracing::warn!(%url, "location change did not unload the page, falling back to router navigation");
                self.window.push_route(url).await
            }
        }
    }
}

#[cfg(test)]
#[path = "redirect_test.rs"]
mod tests;
