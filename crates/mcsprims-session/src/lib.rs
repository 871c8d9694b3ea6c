//! MCS session management.
//!
//! Drives one connection through the version/login handshake, then decodes
//! and dispatches frames until the transport closes. The account binder
//! runs on top of an established session.

pub mod bind;
pub mod config;
pub mod connection;
pub mod error;
pub mod login;
pub mod state;

pub use bind::{
    build_bind_stanza, AccountBinder, BindConfig, CertificateKind, LoginService,
    RegistrationRequest, RegistrationService, ServiceError,
};
pub use config::{SessionConfig, CLIENT_ID, DOMAIN, NETWORK_TYPE, SERVICE_HOSTNAME, SERVICE_PORT};
pub use connection::{Connection, DataMessageHandler, Sender};
pub use error::{Result, SessionError};
pub use login::{build_login_request, CheckinResult};
pub use state::{SessionState, SessionStateMachine};
