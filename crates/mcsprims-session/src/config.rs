use mcsprims_frame::FrameConfig;

/// Default MCS endpoint.
pub const SERVICE_HOSTNAME: &str = "mtalk.google.com";
pub const SERVICE_PORT: u16 = 5228;

/// Client version string sent as the login request id.
pub const CLIENT_ID: &str = "gms-12.2.21-000";
pub const DOMAIN: &str = "mcs.android.com";
/// Network type reported at login (1 = wifi).
pub const NETWORK_TYPE: i32 = 1;

/// Fixed parameters of one MCS session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Wire framing parameters (versions, payload cap).
    pub frame: FrameConfig,
    /// Login request id.
    pub client_id: String,
    /// Login request domain.
    pub domain: String,
    /// Network type reported at login.
    pub network_type: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: SERVICE_HOSTNAME.to_string(),
            port: SERVICE_PORT,
            frame: FrameConfig::default(),
            client_id: CLIENT_ID.to_string(),
            domain: DOMAIN.to_string(),
            network_type: NETWORK_TYPE,
        }
    }
}
