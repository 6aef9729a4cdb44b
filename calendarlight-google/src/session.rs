//! The signed-in Google session (access + refresh token), kept in
//! `token.toml` and refreshed when it expires.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calendarlight_core::CalendarLightError;
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;

/// Refresh a little early so a token does not expire mid-request.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl SessionData {
    fn from_token(token: &AccessToken, now: DateTime<Utc>) -> Self {
        SessionData {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at: now + Duration::seconds(token.expires_in),
        }
    }
}

pub struct Session {
    path: PathBuf,
    data: SessionData,
}

impl Session {
    pub fn from_token(path: &Path, token: &AccessToken) -> Self {
        Session {
            path: path.to_path_buf(),
            data: SessionData::from_token(token, Utc::now()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CalendarLightError::NotLoggedIn.into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Google session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse Google session from {}", path.display()))?;

        Ok(Session {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Load the session, refreshing (and saving) it if it has expired.
    pub async fn load_valid(path: &Path, creds: &Credentials) -> Result<Self> {
        let mut session = Self::load(path)?;

        if session.is_expired_at(Utc::now()) {
            if session.data.refresh_token.is_empty() {
                return Err(CalendarLightError::NotLoggedIn.into());
            }
            tracing::debug!("Access token expired, refreshing");
            session.refresh(creds).await?;
        }

        Ok(session)
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Owner-only: the file holds OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.data.expires_at
    }

    pub fn client(&self, creds: &Credentials) -> Client {
        Client::new(
            creds.client_id.clone(),
            creds.client_secret.clone(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    async fn refresh(&mut self, creds: &Credentials) -> Result<()> {
        let mut token = self
            .client(creds)
            .refresh_access_token()
            .await
            .context("Failed to refresh Google access token")?;

        // Google usually omits the refresh token on refresh
        if token.refresh_token.is_empty() {
            token.refresh_token = self.data.refresh_token.clone();
        }

        self.data = SessionData::from_token(&token, Utc::now());
        self.save()
    }
}
