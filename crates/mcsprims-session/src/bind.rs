use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use mcsprims_proto::{AppData, DataMessageStanza};
use tracing::info;

use crate::connection::Sender;
use crate::error::{Result, SessionError};

/// Error type returned by external services, passed through unchanged.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// Certificate the login service signs a token request with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateKind {
    Google,
    Android,
}

/// OAuth-style login service.
pub trait LoginService {
    /// Fetch an auth cookie for `scope` on behalf of `package`.
    fn fetch_service_auth_cookie(
        &self,
        scope: &str,
        package: &str,
        certificate: CertificateKind,
    ) -> std::result::Result<String, ServiceError>;

    /// Account email the cookie belongs to.
    fn email(&self) -> String;
}

/// Request for a push channel token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub senders: Vec<String>,
    pub app_pkg_name: String,
    pub app_ver: String,
    pub app_cert: String,
    pub extras: BTreeMap<String, String>,
}

/// Push registration service.
pub trait RegistrationService {
    /// Register and return the issued channel token.
    fn perform_register(
        &self,
        request: &RegistrationRequest,
    ) -> std::result::Result<String, ServiceError>;
}

/// Fixed identifiers used when binding an account to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    pub senders: Vec<String>,
    pub app_package: String,
    pub app_cert: String,
    pub message_id_key: String,
    pub message_id: String,
    pub scope: String,
    pub certificate: CertificateKind,
    pub to: String,
    pub category: String,
    pub persistent_id: String,
    pub ttl_secs: i32,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            senders: vec!["745476177629".to_string()],
            app_package: "com.google.android.gms".to_string(),
            app_cert: "38918a453d07199354f8b19af05ec6562ced5788".to_string(),
            message_id_key: "google.message_id".to_string(),
            message_id: "google.rpc1".to_string(),
            scope: "oauth2:https://www.googleapis.com/auth/gcm".to_string(),
            certificate: CertificateKind::Google,
            to: "google.com".to_string(),
            category: "com.google.android.gms".to_string(),
            persistent_id: "0".to_string(),
            ttl_secs: 86_400,
        }
    }
}

/// Associates an account with an established session.
///
/// One-shot: obtains a channel token and an auth cookie, then sends a data
/// message carrying both. No retries; service failures are returned as-is.
pub struct AccountBinder<'a> {
    login: &'a dyn LoginService,
    registration: &'a dyn RegistrationService,
    app_version: String,
    config: BindConfig,
}

impl fmt::Debug for AccountBinder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountBinder")
            .field("app_version", &self.app_version)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> AccountBinder<'a> {
    pub fn new(
        login: &'a dyn LoginService,
        registration: &'a dyn RegistrationService,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            login,
            registration,
            app_version: app_version.into(),
            config: BindConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self
    }

    /// The registration request this binder submits.
    pub fn registration_request(&self) -> RegistrationRequest {
        let mut extras = BTreeMap::new();
        extras.insert(
            self.config.message_id_key.clone(),
            self.config.message_id.clone(),
        );
        RegistrationRequest {
            senders: self.config.senders.clone(),
            app_pkg_name: self.config.app_package.clone(),
            app_ver: self.app_version.clone(),
            app_cert: self.config.app_cert.clone(),
            extras,
        }
    }

    /// Bind using the current wall-clock time.
    pub fn bind<W: Write>(&self, sender: &Sender<W>) -> Result<DataMessageStanza> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        self.bind_at(sender, now)
    }

    /// Bind with an explicit unix timestamp (seconds) and return the sent stanza.
    pub fn bind_at<W: Write>(
        &self,
        sender: &Sender<W>,
        unix_secs: i64,
    ) -> Result<DataMessageStanza> {
        let state = sender.state();
        if !state.can_send() {
            return Err(SessionError::HandshakeIncomplete(state));
        }

        let channel_token = self
            .registration
            .perform_register(&self.registration_request())
            .map_err(SessionError::Registration)?;

        let cookie = self
            .login
            .fetch_service_auth_cookie(
                &self.config.scope,
                &self.config.app_package,
                self.config.certificate,
            )
            .map_err(SessionError::Login)?;

        let stanza = build_bind_stanza(
            &self.config,
            &self.login.email(),
            &cookie,
            &channel_token,
            unix_secs,
        );
        sender.send(&stanza)?;
        info!(
            id = stanza.id.as_deref().unwrap_or_default(),
            "account bind message sent"
        );
        Ok(stanza)
    }
}

/// Build the data message that binds `email` to the session.
pub fn build_bind_stanza(
    config: &BindConfig,
    email: &str,
    auth_cookie: &str,
    channel_token: &str,
    unix_secs: i64,
) -> DataMessageStanza {
    DataMessageStanza {
        id: Some(format!("{unix_secs}-0")),
        from: String::new(),
        to: Some(config.to.clone()),
        category: config.category.clone(),
        persistent_id: Some(config.persistent_id.clone()),
        ttl: Some(config.ttl_secs),
        sent: Some(unix_secs),
        status: Some(0),
        app_data: vec![
            AppData::new("a", email),
            AppData::new("t", auth_cookie),
            AppData::new("id", channel_token),
        ],
        ..DataMessageStanza::default()
    }
}
