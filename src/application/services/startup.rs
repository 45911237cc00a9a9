//! Startup: resolve the endpoint and a valid token for this run
//!
//! Token sources, first match wins: `--token`, configured token, login.
//! A token obtained by logging in is written back to the config file.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{persist_token, Settings};
use crate::domain::Config;
use crate::infrastructure::traits::{ApiConnector, FileSystem, Prompter};
use crate::infrastructure::ApiErrorKind;

/// Endpoint used with `--dev`.
pub const DEV_BASE_URL: &str = "http://localhost:9000";

/// Login-related command line input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginArgs {
    pub token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dev: bool,
    pub server_url: Option<String>,
}

/// Produces the per-run `Config`.
pub struct StartupService {
    settings: Arc<Settings>,
    api: Arc<dyn ApiConnector>,
    prompter: Arc<dyn Prompter>,
    fs: Arc<dyn FileSystem>,
    credentials_path: Option<PathBuf>,
}

impl StartupService {
    pub fn new(
        settings: Arc<Settings>,
        api: Arc<dyn ApiConnector>,
        prompter: Arc<dyn Prompter>,
        fs: Arc<dyn FileSystem>,
        credentials_path: Option<PathBuf>,
    ) -> Self {
        Self {
            settings,
            api,
            prompter,
            fs,
            credentials_path,
        }
    }

    /// Endpoint precedence: `--server-url`, `--dev`, settings.
    pub fn base_url(&self, login: &LoginArgs) -> String {
        if let Some(url) = login.server_url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        if login.dev {
            return DEV_BASE_URL.to_string();
        }
        self.settings.base_url.clone()
    }

    #[instrument(skip_all)]
    pub fn startup(&self, login: &LoginArgs) -> ApplicationResult<Config> {
        let base_url = self.base_url(login);
        debug!("startup: base_url={base_url}");

        let known_token = login
            .token
            .clone()
            .or_else(|| self.settings.token.clone())
            .filter(|t| !t.trim().is_empty());

        if let Some(token) = known_token {
            let config = Config {
                token,
                base_url: base_url.clone(),
            };
            match self.api.connect(&config)?.validate() {
                Ok(()) => return Ok(config),
                Err(e) if e.kind == ApiErrorKind::Forbidden => {
                    return Err(ApplicationError::AccountDisabled)
                }
                Err(e) => warn!("token rejected, logging in again: {e}"),
            }
        }

        let token = self.login(&base_url, login)?;
        self.persist(&token)?;
        Ok(Config { token, base_url })
    }

    fn login(&self, base_url: &str, login: &LoginArgs) -> ApplicationResult<String> {
        let email = match &login.email {
            Some(email) => email.clone(),
            None => self.prompter.input("Email").with_context("read email")?,
        };
        let password = match &login.password {
            Some(password) => password.clone(),
            None => self
                .prompter
                .password("Password")
                .with_context("read password")?,
        };

        let anonymous = Config {
            token: String::new(),
            base_url: base_url.to_string(),
        };
        match self.api.connect(&anonymous)?.login(email.trim(), &password) {
            Ok(token) => {
                info!("logged in as {}", email.trim());
                Ok(token)
            }
            Err(e) if e.kind == ApiErrorKind::Forbidden => Err(ApplicationError::AccountDisabled),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, token: &str) -> ApplicationResult<()> {
        match &self.credentials_path {
            Some(path) => {
                persist_token(self.fs.as_ref(), path, token)?;
                debug!("token saved to {}", path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}
