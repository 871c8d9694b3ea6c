use std::fmt;

use mcsprims_proto::{AuthService, LoginRequest};

use crate::config::SessionConfig;

/// Device identity issued by the checkin service.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CheckinResult {
    /// Numeric device identifier.
    pub android_id: u64,
    /// Secret paired with the identifier. Never logged.
    pub security_token: u64,
}

impl CheckinResult {
    pub fn new(android_id: u64, security_token: u64) -> Self {
        Self {
            android_id,
            security_token,
        }
    }

    /// The device identifier as lowercase hex.
    pub fn android_id_hex(&self) -> String {
        format!("{:x}", self.android_id)
    }
}

impl fmt::Debug for CheckinResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckinResult")
            .field("android_id", &self.android_id)
            .field("security_token", &format_args!("<redacted>"))
            .finish()
    }
}

/// Build the login request that opens a session for `checkin`.
pub fn build_login_request(checkin: &CheckinResult, config: &SessionConfig) -> LoginRequest {
    let android_id = checkin.android_id.to_string();
    let mut request = LoginRequest {
        id: config.client_id.clone(),
        domain: config.domain.clone(),
        user: android_id.clone(),
        resource: android_id,
        auth_token: checkin.security_token.to_string(),
        device_id: Some(format!("android-{}", checkin.android_id_hex())),
        use_rmq2: Some(true),
        network_type: Some(config.network_type),
        ..LoginRequest::default()
    };
    request.set_auth_service(AuthService::AndroidId);
    request
}
