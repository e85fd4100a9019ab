use serde_json::Value;

use super::GetSessionOptions;
use crate::client::{AuthClient, is_blank};
use crate::error::AuthError;

impl AuthClient {
    /// Fetch the session and store it in the container.
    ///
    /// Fetch failures are not errors: they leave the container
    /// unauthenticated. With `options.required`, a missing session runs
    /// `on_unauthenticated` (whose result is returned) or navigates to
    /// `callback_url`, falling back to the current URL.
    ///
    /// # Errors
    ///
    /// Only a failed redirect is reported.
    pub async fn get_session(&self, options: GetSessionOptions) -> Result<Option<Value>, AuthError> {
        self.session().begin_loading();

        let data = match self.fetch_session().await {
            Ok(data) => Some(data),
            Err(e @ AuthError::Status { .. }) => {
                tracing::debug!(error = %e, "no session");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "session fetch failed");
                None
            }
        };
        self.session().set_data(data);
        self.session().finish_loading();

        let data = self.session().data();
        if options.required && data.is_none() {
            if let Some(handler) = options.on_unauthenticated {
                return Ok(handler());
            }
            let target = options
                .callback_url
                .filter(|url| !is_blank(url))
                .unwrap_or_else(|| self.request().url().to_owned());
            self.navigate(&target).await?;
            return Ok(None);
        }

        Ok(data)
    }

    /// `get_session` with default options.
    ///
    /// # Errors
    ///
    /// Never fails in practice: without `required` no redirect is attempted.
    pub async fn refresh(&self) -> Result<Option<Value>, AuthError> {
        self.get_session(GetSessionOptions::default()).await
    }

    async fn fetch_session(&self) -> Result<Value, AuthError> {
        let endpoint = self
            .config()
            .endpoints
            .get_session
            .clone()
            .ok_or(AuthError::MissingEndpoint("get_session"))?;
        // Servers may validate the origin of session lookups.
        let request = self
            .request_for(&endpoint)
            .header("Referer", self.request().url());
        self.send_json(request).await
    }
}

#[cfg(test)]
#[path = "get_session_test.rs"]
mod tests;
