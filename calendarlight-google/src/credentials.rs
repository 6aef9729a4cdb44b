//! Google OAuth client credentials (user-provided).
//!
//! Accepts the JSON file downloaded from the Google Cloud console, which
//! nests the client under `installed` (desktop apps) or `web`, as well as a
//! flat `{ "client_id": ..., "client_secret": ... }` object.

use std::path::Path;

use anyhow::{Context, Result};
use calendarlight_core::paths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

impl From<CredentialsFile> for Credentials {
    fn from(file: CredentialsFile) -> Self {
        match file {
            CredentialsFile::Installed { installed } => installed,
            CredentialsFile::Web { web } => web,
            CredentialsFile::Flat(creds) => creds,
        }
    }
}

pub fn parse(contents: &str) -> Result<Credentials> {
    let file: CredentialsFile = serde_json::from_str(contents)
        .context("Expected a Google OAuth client file with client_id and client_secret")?;
    Ok(file.into())
}

pub fn load_from(path: &Path) -> Result<Credentials> {
    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Create an OAuth client (type \"Desktop app\") at\n\
            https://console.cloud.google.com/apis/credentials\n\
            and save the downloaded JSON file as:\n\n  {}",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    parse(&contents).with_context(|| format!("Failed to parse credentials from {}", path.display()))
}

pub fn load() -> Result<Credentials> {
    load_from(&paths::credentials_path()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> Credentials {
        Credentials {
            client_id: "id.apps.googleusercontent.com".into(),
            client_secret: "shh".into(),
        }
    }

    #[test]
    fn parses_installed_app_file() {
        let json = r#"{"installed": {
            "client_id": "id.apps.googleusercontent.com",
            "project_id": "calendarlight",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "client_secret": "shh",
            "redirect_uris": ["http://localhost"]
        }}"#;
        assert_eq!(parse(json).unwrap(), expected());
    }

    #[test]
    fn parses_web_and_flat_files() {
        let web = r#"{"web": {"client_id": "id.apps.googleusercontent.com", "client_secret": "shh"}}"#;
        let flat = r#"{"client_id": "id.apps.googleusercontent.com", "client_secret": "shh"}"#;
        assert_eq!(parse(web).unwrap(), expected());
        assert_eq!(parse(flat).unwrap(), expected());
    }

    #[test]
    fn rejects_incomplete_file() {
        assert!(parse(r#"{"installed": {"client_id": "x"}}"#).is_err());
    }

    #[test]
    fn missing_file_explains_setup() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("credentials.json")).unwrap_err();
        assert!(err.to_string().contains("console.cloud.google.com"));
    }
}
