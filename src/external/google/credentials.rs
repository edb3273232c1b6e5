//! Service-account credential resolution.
//!
//! Each credential field is taken from the first source that provides it:
//! 1. the `firebase` configuration section (including `PUSH_RELAY_FIREBASE__*`)
//! 2. the `FIREBASE_PROJECT_ID` / `FIREBASE_CLIENT_EMAIL` / `FIREBASE_PRIVATE_KEY`
//!    process environment
//! 3. a service-account JSON key file named by `firebase.credentials_file`
//!    or `GOOGLE_APPLICATION_CREDENTIALS`

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::config::FirebaseConfig;
use crate::config::error::ConfigError;

const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
const ENV_CLIENT_EMAIL: &str = "FIREBASE_CLIENT_EMAIL";
const ENV_PRIVATE_KEY: &str = "FIREBASE_PRIVATE_KEY";
const ENV_PRIVATE_KEY_ID: &str = "FIREBASE_PRIVATE_KEY_ID";
const ENV_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Credentials used to sign the OAuth2 JWT-bearer assertion
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    pub project_id: String,
    pub client_email: String,
    /// PEM-encoded RSA private key, already unescaped
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Subset of a Google service-account key file we care about
#[derive(Debug, Default, Deserialize)]
struct ServiceAccountKeyFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    project_id: Option<String>,
    private_key_id: Option<String>,
    private_key: Option<String>,
    client_email: Option<String>,
}

impl ServiceAccountCredentials {
    /// Resolve credentials from configuration and the process environment
    pub fn resolve(config: &FirebaseConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve credentials using `lookup` in place of the process environment
    pub fn resolve_with<F>(config: &FirebaseConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |name: &str| non_empty(lookup(name));

        let mut project_id = non_empty(Some(config.project_id.clone())).or_else(|| from_env(ENV_PROJECT_ID));
        let mut client_email =
            non_empty(Some(config.client_email.clone())).or_else(|| from_env(ENV_CLIENT_EMAIL));
        let mut private_key =
            non_empty(Some(config.private_key.clone())).or_else(|| from_env(ENV_PRIVATE_KEY));
        let mut private_key_id =
            non_empty(config.private_key_id.clone()).or_else(|| from_env(ENV_PRIVATE_KEY_ID));

        if project_id.is_none() || client_email.is_none() || private_key.is_none() {
            let key_file_path =
                non_empty(config.credentials_file.clone()).or_else(|| from_env(ENV_APPLICATION_CREDENTIALS));

            if let Some(path) = key_file_path {
                let key_file = load_key_file(Path::new(&path))?;
                tracing::debug!(path = %path, "Filling Firebase credentials from key file");

                project_id = project_id.or(non_empty(key_file.project_id));
                client_email = client_email.or(non_empty(key_file.client_email));
                if private_key.is_none() {
                    private_key = non_empty(key_file.private_key);
                    // The key id only describes the key it came with
                    private_key_id = non_empty(key_file.private_key_id);
                }
            }
        }

        let project_id = project_id.ok_or_else(|| missing("firebase.project_id", ENV_PROJECT_ID))?;
        let client_email =
            client_email.ok_or_else(|| missing("firebase.client_email", ENV_CLIENT_EMAIL))?;
        let private_key =
            private_key.ok_or_else(|| missing("firebase.private_key", ENV_PRIVATE_KEY))?;

        Ok(Self {
            project_id,
            client_email,
            private_key: unescape_private_key(&private_key),
            private_key_id,
            token_uri: config.token_uri.clone(),
        })
    }
}

/// Replace literal `\n` sequences with newlines.
///
/// Keys pasted into env vars or TOML strings usually arrive escaped.
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

fn load_key_file(path: &Path) -> Result<ServiceAccountKeyFile, ConfigError> {
    let file_error = |message: String| ConfigError::CredentialsFile {
        path: path.display().to_string(),
        message,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    let key_file: ServiceAccountKeyFile =
        serde_json::from_str(&contents).map_err(|e| file_error(e.to_string()))?;

    match key_file.kind.as_deref() {
        None | Some("service_account") => Ok(key_file),
        Some(other) => Err(file_error(format!(
            "expected a service_account key, found '{}'",
            other
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(field: &'static str, env_var: &str) -> ConfigError {
    ConfigError::MissingCredential {
        field,
        hint: format!(
            "Set it in the [firebase] config section, via {}, or through a service-account key file ({})",
            env_var, ENV_APPLICATION_CREDENTIALS
        ),
    }
}
