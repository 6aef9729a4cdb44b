//! Browser-based OAuth login for a desktop app.
//!
//! A loopback listener on an ephemeral port receives Google's redirect,
//! so no fixed port has to be free.

use std::path::Path;

use anyhow::{Context, Result};
use google_calendar::Client;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::credentials::Credentials;
use crate::session::Session;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar.readonly"];

const SUCCESS_PAGE: &str = "HTTP/1.1 200 OK\r\n\
    Content-Type: text/html\r\n\
    Connection: close\r\n\
    \r\n\
    <html><body>\
    <h1>calendarlight is signed in</h1>\
    <p>You can close this window and return to the terminal.</p>\
    </body></html>";

const FAILURE_PAGE: &str = "HTTP/1.1 400 Bad Request\r\n\
    Content-Type: text/html\r\n\
    Connection: close\r\n\
    \r\n\
    <html><body>\
    <h1>Sign-in failed</h1>\
    <p>Return to the terminal for details.</p>\
    </body></html>";

/// Run the consent flow and store the resulting session at `token_path`.
pub async fn login(creds: &Credentials, token_path: &Path) -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind OAuth callback listener")?;
    let port = listener.local_addr()?.port();
    let redirect_uri = format!("http://localhost:{port}/");

    let mut client = Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        redirect_uri,
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    println!("\nOpen this URL in your browser to sign in to Google Calendar:\n");
    println!("{auth_url}\n");

    if open::that(&auth_url).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    tracing::debug!("Waiting for OAuth callback on port {}", port);
    let (code, state) = wait_for_callback(listener).await?;

    println!("Received authorization code, exchanging for tokens...");

    let token = client
        .get_access_token(&code, &state)
        .await
        .context("Failed to exchange authorization code for tokens")?;

    if token.refresh_token.is_empty() {
        tracing::warn!("Google did not return a refresh token; you will need to log in again when the session expires");
    }

    Session::from_token(token_path, &token).save()?;
    tracing::info!("Saved Google session to {}", token_path.display());

    Ok(())
}

async fn wait_for_callback(listener: TcpListener) -> Result<(String, String)> {
    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let parsed = parse_callback(&request_line);

    let page = if parsed.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };
    let mut stream = reader.into_inner();
    stream
        .write_all(page.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    parsed
}

/// Pull `code` and `state` out of a request line such as
/// `GET /?state=abc&code=xyz&scope=... HTTP/1.1`.
pub fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = url::Url::parse(&format!("http://localhost{target}"))
        .context("Invalid OAuth callback URL")?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    if let Some(error) = param("error") {
        anyhow::bail!("Google sign-in was not completed: {}", error);
    }

    let code = param("code").ok_or_else(|| anyhow::anyhow!("No code in callback"))?;
    let state = param("state").unwrap_or_default();

    Ok((code, state))
}
