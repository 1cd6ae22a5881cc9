// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credentials and authenticated remote URLs.
//!
//! ```text
//! url_with_credentials(url, creds)     pure, never logs
//!   https://host/r.git + user/pw --> https://user:pw@host/r.git
//!
//! RemoteUrl
//!   for_command()  authenticated (or plain) url handed to git
//!   plain()        what logs and errors show
//!   redact(text)   scrub tool output before it leaves the backend
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{ScmError, ScmResult};

const REDACTED: &str = "***";

/// Username and password (or token) for one remote.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmCredentials {
    user: String,
    password: String,
}

impl ScmCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ScmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScmCredentials")
            .field("user", &self.user)
            .field("password", &REDACTED)
            .finish()
    }
}

fn invalid_url(url: &str, message: impl Into<String>) -> ScmError {
    ScmError::InvalidUrl {
        url: url.to_string(),
        message: message.into(),
    }
}

/// Embeds `credentials` into the user-info part of `url`.
///
/// User and password are percent-encoded as needed.
///
/// # Errors
///
/// Returns `ScmError::InvalidUrl` if `url` does not parse or cannot carry
/// credentials (scp-like `git@host:path`, local paths, `file:` URLs).
pub fn url_with_credentials(url: &str, credentials: &ScmCredentials) -> ScmResult<String> {
    let mut parsed = Url::parse(url).map_err(|e| invalid_url(url, e.to_string()))?;
    if parsed.cannot_be_a_base() || !parsed.has_host() || parsed.scheme() == "file" {
        return Err(invalid_url(url, "url cannot carry credentials"));
    }
    parsed
        .set_username(&credentials.user)
        .map_err(|()| invalid_url(url, "username cannot be set"))?;
    parsed
        .set_password(Some(&credentials.password))
        .map_err(|()| invalid_url(url, "password cannot be set"))?;
    Ok(parsed.into())
}

/// A remote URL prepared for one command, with its redacted counterpart.
#[derive(Clone)]
pub struct RemoteUrl {
    plain: String,
    authenticated: Option<String>,
    secrets: Vec<String>,
}

impl RemoteUrl {
    /// Prepares `url`, embedding `credentials` when given.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::InvalidUrl` if `url` is empty, looks like a
    /// command-line option, or cannot carry the credentials.
    pub fn new(url: &str, credentials: Option<&ScmCredentials>) -> ScmResult<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(invalid_url(url, "url is empty"));
        }
        if trimmed.starts_with('-') {
            return Err(invalid_url(url, "url must not start with '-'"));
        }

        let Some(credentials) = credentials else {
            return Ok(Self {
                plain: trimmed.to_string(),
                authenticated: None,
                secrets: Vec::new(),
            });
        };

        let authenticated = url_with_credentials(trimmed, credentials)?;
        let mut secrets = Vec::new();
        if !credentials.password.is_empty() {
            if let Some(encoded) = Url::parse(&authenticated)
                .ok()
                .and_then(|u| u.password().map(str::to_string))
                && encoded != credentials.password
            {
                secrets.push(encoded);
            }
            secrets.push(credentials.password.clone());
        }

        Ok(Self {
            plain: trimmed.to_string(),
            authenticated: Some(authenticated),
            secrets,
        })
    }

    /// The URL without credentials.
    #[must_use]
    pub fn plain(&self) -> &str {
        &self.plain
    }

    /// The URL to hand to the tool.
    #[must_use]
    pub fn for_command(&self) -> &str {
        self.authenticated.as_deref().unwrap_or(&self.plain)
    }

    /// Whether credentials are embedded.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated.is_some()
    }

    /// Removes every trace of the credentials from `text`.
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        let mut out = match &self.authenticated {
            Some(auth) => text.replace(auth.as_str(), &self.plain),
            None => text.to_string(),
        };
        for secret in &self.secrets {
            out = out.replace(secret.as_str(), REDACTED);
        }
        out
    }
}

impl fmt::Debug for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteUrl")
            .field("url", &self.plain)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
