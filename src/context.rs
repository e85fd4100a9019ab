//! Which side of the render boundary an auth call runs on, and the URL of
//! the page or request being served.

/// Execution side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Rendering an incoming HTTP request. Cookies must be forwarded by hand
    /// and redirects are HTTP responses.
    Server,
    /// Running in the user's page session.
    Browser,
}

/// The current request (server) or page (browser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    side: Side,
    url: String,
}

impl RequestContext {
    #[must_use]
    pub fn server(url: impl Into<String>) -> Self {
        Self { side: Side::Server, url: url.into() }
    }

    #[must_use]
    pub fn browser(url: impl Into<String>) -> Self {
        Self { side: Side::Browser, url: url.into() }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn is_server(&self) -> bool {
        self.side == Side::Server
    }

    /// Full URL (or path) of the current request.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}
