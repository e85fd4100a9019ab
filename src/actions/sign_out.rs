use serde_json::Value;

use super::SignOutOptions;
use crate::client::AuthClient;
use crate::error::AuthError;

impl AuthClient {
    /// Sign out. Session data is cleared before any request is sent and stays
    /// cleared even if the request fails.
    ///
    /// Without a `sign_out` endpoint the sign-out is local: the session
    /// cookie is dropped from the cookie store and nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CsrfAcquisition`] if no CSRF cookie can be
    /// obtained, and transport/status errors from the sign-out request.
    pub async fn sign_out(&self, options: SignOutOptions) -> Result<Option<Value>, AuthError> {
        self.session().clear_data();

        let response = match self.config().endpoints.sign_out.clone() {
            Some(endpoint) => {
                self.ensure_csrf().await?;
                let body = self.send_json(self.mutating_request_for(&endpoint)).await?;
                Some(body).filter(|value| !value.is_null())
            }
            None => {
                tracing::debug!("no sign_out endpoint configured, signing out locally");
                self.cookies().remove(&self.config().cookie.name);
                None
            }
        };

        if options.redirect {
            let target = self.callback_url(options.callback_url.as_deref(), true);
            self.navigate(&target).await?;
        }

        Ok(response)
    }
}

#[cfg(test)]
#[path = "sign_out_test.rs"]
mod tests;
