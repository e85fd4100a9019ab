use std::sync::Arc;

use axum::http::header::{COOKIE, HeaderMap, HeaderValue, InvalidHeaderValue};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use session_auth::cookies::MemoryCookieStore;
use session_auth::http::ReqwestTransport;
use session_auth::redirect::ServerNavigator;
use session_auth::{
    AuthClient, AuthConfig, AuthError, Credentials, GetSessionOptions, RequestContext, SignInOptions, SignOutOptions,
    SignUpOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid cookie header: {0}")]
    InvalidCookie(#[from] InvalidHeaderValue),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authctl", about = "Sign in, sign out and inspect sessions against an auth backend")]
struct Cli {
    /// Origin relative endpoint URLs are resolved against.
    #[arg(long, env = "AUTH_APP_ORIGIN", default_value = "http://127.0.0.1:3000")]
    origin: String,

    /// URL treated as the current page; defaults to the origin.
    #[arg(long, env = "AUTH_PAGE_URL")]
    page: Option<String>,

    /// Cookies to start with, as a `Cookie` header (`a=1; b=2`).
    #[arg(long, env = "AUTH_COOKIE")]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a CSRF token.
    Csrf,
    /// Fetch the current session.
    Session {
        #[arg(long)]
        required: bool,
    },
    SignIn {
        /// Credential field as `key=value`; repeatable.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        #[arg(long)]
        callback_url: Option<String>,
        /// Print the sign-in response instead of redirecting.
        #[arg(long)]
        no_redirect: bool,
    },
    SignUp {
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Stop after registering.
        #[arg(long)]
        no_login: bool,
    },
    SignOut {
        #[arg(long)]
        callback_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = AuthConfig::from_env()?;

    let cookies = Arc::new(match cli.cookie.as_deref() {
        Some(raw) => MemoryCookieStore::from_headers(&cookie_headers(raw)?),
        None => MemoryCookieStore::new(),
    });
    let navigator = Arc::new(ServerNavigator::new());
    let transport = Arc::new(ReqwestTransport::new(Some(cli.origin.as_str()))?);
    let page = cli.page.clone().unwrap_or_else(|| cli.origin.clone());

    let client = AuthClient::new(
        Arc::new(config),
        RequestContext::server(page),
        transport,
        cookies.clone(),
        navigator.clone(),
    );

    let result = run(&client, cli.command).await?;

    print_json(&json!({
        "result": result,
        "status": format!("{:?}", client.status()),
        "redirect": navigator.location(),
        "set_cookies": cookies.take_set_cookies(),
    }))
}

async fn run(client: &AuthClient, command: Command) -> Result<Option<Value>, CliError> {
    let result = match command {
        Command::Csrf => Some(Value::String(client.get_csrf_token().await?)),
        Command::Session { required } => {
            let options = GetSessionOptions { required, ..GetSessionOptions::default() };
            client.get_session(options).await?
        }
        Command::SignIn { fields, callback_url, no_redirect } => {
            let options = SignInOptions { callback_url, redirect: !no_redirect, ..SignInOptions::default() };
            client.sign_in(credentials(fields), options).await?
        }
        Command::SignUp { fields, no_login } => {
            let options = SignUpOptions { prevent_login_flow: no_login, ..SignUpOptions::default() };
            client.sign_up(credentials(fields), options).await?
        }
        Command::SignOut { callback_url } => {
            client
                .sign_out(SignOutOptions { callback_url, ..SignOutOptions::default() })
                .await?
        }
    };
    Ok(result)
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn credentials(fields: Vec<(String, String)>) -> Credentials {
    fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

fn cookie_headers(raw: &str) -> Result<HeaderMap, CliError> {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(raw)?);
    Ok(headers)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
