//! Mock collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde_json::{Map, Value, json};

use crate::client::AuthClient;
use crate::config::{AuthConfig, Endpoint, Endpoints, HttpMethod};
use crate::context::RequestContext;
use crate::cookies::MemoryCookieStore;
use crate::error::AuthError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::redirect::Navigator;
use crate::session::{SessionSnapshot, SessionState};

pub const CURRENT_URL: &str = "https://app.example/login";

// =========================================================================
// MockTransport
// =========================================================================

enum MockReply {
    Respond(HttpResponse),
    Fail,
}

/// Canned responses keyed by `"METHOD url"`. Unknown routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, MockReply>>,
    calls: Mutex<Vec<HttpRequest>>,
    watched: Mutex<Option<SessionState>>,
    observed: Mutex<Vec<SessionSnapshot>>,
}

impl MockTransport {
    pub fn on(&self, method: Method, url: &str, response: HttpResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{method} {url}"), MockReply::Respond(response));
    }

    pub fn fail(&self, method: Method, url: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{method} {url}"), MockReply::Fail);
    }

    /// Record the session state seen at the moment each request is sent.
    pub fn watch_session(&self, session: SessionState) {
        *self.watched.lock().unwrap() = Some(session);
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// `"METHOD url"` for every call, in order.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| format!("{} {}", call.method, call.url))
            .collect()
    }

    pub fn observed(&self) -> Vec<SessionSnapshot> {
        self.observed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let key = format!("{} {}", request.method, request.url);
        if let Some(session) = self.watched.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(session.snapshot());
        }
        self.calls.lock().unwrap().push(request);

        match self.routes.lock().unwrap().get(&key) {
            Some(MockReply::Respond(response)) => Ok(response.clone()),
            Some(MockReply::Fail) => Err(AuthError::Transport("connection refused".into())),
            None => Ok(HttpResponse { status: 404, ..HttpResponse::default() }),
        }
    }
}

// =========================================================================
// MockNavigator
// =========================================================================

#[derive(Default)]
pub struct MockNavigator {
    visits: Mutex<Vec<(String, bool)>>,
}

impl MockNavigator {
    pub fn visits(&self) -> Vec<(String, bool)> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Navigator for MockNavigator {
    async fn navigate(&self, url: &str, external: bool) -> Result<(), AuthError> {
        self.visits.lock().unwrap().push((url.to_owned(), external));
        Ok(())
    }
}

// =========================================================================
// Harness
// =========================================================================

pub struct Harness {
    pub client: AuthClient,
    pub transport: Arc<MockTransport>,
    pub cookies: Arc<MemoryCookieStore>,
    pub navigator: Arc<MockNavigator>,
}

pub fn harness(config: AuthConfig, request: RequestContext) -> Harness {
    let transport = Arc::new(MockTransport::default());
    let cookies = Arc::new(MemoryCookieStore::new());
    let navigator = Arc::new(MockNavigator::default());
    let client = AuthClient::new(Arc::new(config), request, transport.clone(), cookies.clone(), navigator.clone());
    Harness { client, transport, cookies, navigator }
}

/// Browser-side harness on [`scenario_config`] at [`CURRENT_URL`].
pub fn browser_harness() -> Harness {
    harness(scenario_config(), RequestContext::browser(CURRENT_URL))
}

/// Endpoints at the root path: `/login`, `/logout`, `/register`, `/user`, `/csrf`.
pub fn scenario_config() -> AuthConfig {
    AuthConfig {
        base_url: "/".to_owned(),
        origin_env_key: None,
        endpoints: Endpoints {
            sign_in: Some(Endpoint::new("/login", HttpMethod::Post)),
            sign_out: Some(Endpoint::new("/logout", HttpMethod::Post)),
            sign_up: Some(Endpoint::new("/register", HttpMethod::Post)),
            get_session: Some(Endpoint::new("/user", HttpMethod::Get)),
            csrf: Some(Endpoint::new("/csrf", HttpMethod::Get)),
        },
        ..AuthConfig::default()
    }
}

/// CSRF endpoint response that sets the `XSRF-TOKEN` cookie.
pub fn csrf_response() -> HttpResponse {
    HttpResponse {
        status: 200,
        set_cookies: vec!["XSRF-TOKEN=tok123; Path=/; SameSite=Lax".to_owned()],
        body: json!({ "csrfToken": "tok123" }).to_string(),
    }
}

pub fn user_json() -> Value {
    json!({ "id": 1, "email": "a@b.com", "name": "Ada" })
}

pub fn credentials() -> Map<String, Value> {
    let Value::Object(map) = json!({ "email": "a@b.com", "password": "x" }) else {
        unreachable!()
    };
    map
}
