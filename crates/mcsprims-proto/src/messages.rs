//! proto2 records carried in MCS frames.
//!
//! Field numbers follow `mcs.proto`. Only the records this client sends or
//! receives are modeled; unknown fields are skipped on decode.

use std::fmt;

use mcsprims_frame::McsTag;

/// A record that travels in frames under a fixed tag.
pub trait TaggedMessage: prost::Message + Default {
    /// Tag written ahead of this record on the wire.
    const TAG: McsTag;
}

/// Records an application may send once the session is up.
///
/// Login requests and heartbeats belong to the session engine and are not
/// part of this set.
///
/// ```compile_fail
/// fn sendable<M: mcsprims_proto::ApplicationMessage>() {}
/// sendable::<mcsprims_proto::LoginRequest>();
/// ```
pub trait ApplicationMessage: TaggedMessage {}

impl ApplicationMessage for DataMessageStanza {}
impl ApplicationMessage for IqStanza {}

/// Name/value pair used by login exchanges.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Setting {
    #[prost(string, required, tag = "1")]
    pub name: String,
    #[prost(string, required, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeartbeatStat {
    #[prost(string, required, tag = "1")]
    pub ip: String,
    #[prost(bool, required, tag = "2")]
    pub timeout: bool,
    #[prost(int32, required, tag = "3")]
    pub interval_ms: i32,
}

/// Server-suggested heartbeat parameters.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeartbeatConfig {
    #[prost(bool, optional, tag = "1")]
    pub upload_stat: Option<bool>,
    #[prost(string, optional, tag = "2")]
    pub ip: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub interval_ms: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Extension {
    #[prost(int32, required, tag = "1")]
    pub id: i32,
    #[prost(bytes = "vec", required, tag = "2")]
    pub data: Vec<u8>,
}

/// Error details attached to login responses and IQ stanzas.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorInfo {
    #[prost(int32, required, tag = "1")]
    pub code: i32,
    #[prost(string, optional, tag = "2")]
    pub message: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub r#type: Option<String>,
    #[prost(message, optional, tag = "4")]
    pub extension: Option<Extension>,
}

/// Keepalive ping. Answered with an empty [`HeartbeatAck`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeartbeatPing {
    #[prost(int32, optional, tag = "1")]
    pub stream_id: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub last_stream_id_received: Option<i32>,
    #[prost(int64, optional, tag = "3")]
    pub status: Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeartbeatAck {
    #[prost(int32, optional, tag = "1")]
    pub stream_id: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub last_stream_id_received: Option<i32>,
    #[prost(int64, optional, tag = "3")]
    pub status: Option<i64>,
}

/// How the login request authenticates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AuthService {
    AndroidId = 2,
}

/// First frame a client sends. Never received.
#[derive(Clone, PartialEq, ::prost::Message)]
#[prost(skip_debug)]
pub struct LoginRequest {
    #[prost(string, required, tag = "1")]
    pub id: String,
    #[prost(string, required, tag = "2")]
    pub domain: String,
    #[prost(string, required, tag = "3")]
    pub user: String,
    #[prost(string, required, tag = "4")]
    pub resource: String,
    #[prost(string, required, tag = "5")]
    pub auth_token: String,
    #[prost(string, optional, tag = "6")]
    pub device_id: Option<String>,
    #[prost(int64, optional, tag = "7")]
    pub last_rmq_id: Option<i64>,
    #[prost(message, repeated, tag = "8")]
    pub setting: Vec<Setting>,
    #[prost(string, repeated, tag = "10")]
    pub received_persistent_id: Vec<String>,
    #[prost(bool, optional, tag = "12")]
    pub adaptive_heartbeat: Option<bool>,
    #[prost(message, optional, tag = "13")]
    pub heartbeat_stat: Option<HeartbeatStat>,
    #[prost(bool, optional, tag = "14")]
    pub use_rmq2: Option<bool>,
    #[prost(int64, optional, tag = "15")]
    pub account_id: Option<i64>,
    #[prost(enumeration = "AuthService", optional, tag = "16")]
    pub auth_service: Option<i32>,
    #[prost(int32, optional, tag = "17")]
    pub network_type: Option<i32>,
    #[prost(int64, optional, tag = "18")]
    pub status: Option<i64>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("id", &self.id)
            .field("domain", &self.domain)
            .field("user", &self.user)
            .field("resource", &self.resource)
            .field(
                "auth_token",
                &format_args!("<redacted:{} bytes>", self.auth_token.len()),
            )
            .field("device_id", &self.device_id)
            .field("use_rmq2", &self.use_rmq2)
            .field("auth_service", &self.auth_service)
            .field("network_type", &self.network_type)
            .finish_non_exhaustive()
    }
}

/// Server reply to the login request; completes the handshake.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginResponse {
    #[prost(string, required, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub jid: Option<String>,
    #[prost(message, optional, tag = "3")]
    pub error: Option<ErrorInfo>,
    #[prost(message, repeated, tag = "4")]
    pub setting: Vec<Setting>,
    #[prost(int32, optional, tag = "5")]
    pub stream_id: Option<i32>,
    #[prost(int32, optional, tag = "6")]
    pub last_stream_id_received: Option<i32>,
    #[prost(message, optional, tag = "7")]
    pub heartbeat_config: Option<HeartbeatConfig>,
    #[prost(int64, optional, tag = "8")]
    pub server_timestamp: Option<i64>,
}

/// Sent by the server right before it drops the stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamErrorStanza {
    #[prost(string, required, tag = "1")]
    pub r#type: String,
    #[prost(string, optional, tag = "2")]
    pub text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum IqType {
    Get = 0,
    Set = 1,
    Result = 2,
    IqError = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IqStanza {
    #[prost(int64, optional, tag = "1")]
    pub rmq_id: Option<i64>,
    #[prost(enumeration = "IqType", required, tag = "2")]
    pub r#type: i32,
    #[prost(string, required, tag = "3")]
    pub id: String,
    #[prost(string, optional, tag = "4")]
    pub from: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub to: Option<String>,
    #[prost(message, optional, tag = "6")]
    pub error: Option<ErrorInfo>,
    #[prost(message, optional, tag = "7")]
    pub extension: Option<Extension>,
    #[prost(string, optional, tag = "8")]
    pub persistent_id: Option<String>,
    #[prost(int32, optional, tag = "9")]
    pub stream_id: Option<i32>,
    #[prost(int32, optional, tag = "10")]
    pub last_stream_id_received: Option<i32>,
    #[prost(int64, optional, tag = "11")]
    pub account_id: Option<i64>,
    #[prost(int64, optional, tag = "12")]
    pub status: Option<i64>,
}

/// Key/value entry in a data message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppData {
    #[prost(string, required, tag = "1")]
    pub key: String,
    #[prost(string, required, tag = "2")]
    pub value: String,
}

impl AppData {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Application-level push message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataMessageStanza {
    #[prost(int64, optional, tag = "1")]
    pub rmq_id: Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub id: Option<String>,
    #[prost(string, required, tag = "3")]
    pub from: String,
    #[prost(string, optional, tag = "4")]
    pub to: Option<String>,
    #[prost(string, required, tag = "5")]
    pub category: String,
    #[prost(string, optional, tag = "6")]
    pub token: Option<String>,
    #[prost(message, repeated, tag = "7")]
    pub app_data: Vec<AppData>,
    #[prost(bool, optional, tag = "8")]
    pub from_trusted_server: Option<bool>,
    #[prost(string, optional, tag = "9")]
    pub persistent_id: Option<String>,
    #[prost(int32, optional, tag = "10")]
    pub stream_id: Option<i32>,
    #[prost(int32, optional, tag = "11")]
    pub last_stream_id_received: Option<i32>,
    #[prost(string, optional, tag = "13")]
    pub reg_id: Option<String>,
    #[prost(int64, optional, tag = "16")]
    pub device_user_id: Option<i64>,
    #[prost(int32, optional, tag = "17")]
    pub ttl: Option<i32>,
    #[prost(int64, optional, tag = "18")]
    pub sent: Option<i64>,
    #[prost(int32, optional, tag = "19")]
    pub queued: Option<i32>,
    #[prost(int64, optional, tag = "20")]
    pub status: Option<i64>,
    #[prost(bytes = "vec", optional, tag = "21")]
    pub raw_data: Option<Vec<u8>>,
    #[prost(bool, optional, tag = "24")]
    pub immediate_ack: Option<bool>,
}

impl DataMessageStanza {
    /// Value of the first app-data entry with `key`.
    pub fn app_data_value(&self, key: &str) -> Option<&str> {
        self.app_data
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }
}

macro_rules! tagged {
    ($($ty:ident => $tag:ident),* $(,)?) => {
        $(
            impl TaggedMessage for $ty {
                const TAG: McsTag = McsTag::$tag;
            }
        )*
    };
}

tagged! {
    HeartbeatPing => HeartbeatPing,
    HeartbeatAck => HeartbeatAck,
    LoginRequest => LoginRequest,
    LoginResponse => LoginResponse,
    IqStanza => IqStanza,
    DataMessageStanza => DataMessageStanza,
    StreamErrorStanza => StreamErrorStanza,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn empty_ack_encodes_to_nothing() {
        assert!(HeartbeatAck::default().encode_to_vec().is_empty());
    }

    #[test]
    fn login_request_debug_redacts_token() {
        let req = LoginRequest {
            auth_token: "9876543210".to_string(),
            ..LoginRequest::default()
        };
        let debug = format!("{req:?}");
        assert!(!debug.contains("9876543210"));
        assert!(debug.contains("<redacted:10 bytes>"));
    }

    #[test]
    fn auth_service_accessor() {
        let mut req = LoginRequest::default();
        req.set_auth_service(AuthService::AndroidId);
        assert_eq!(req.auth_service, Some(2));
        assert_eq!(req.auth_service(), AuthService::AndroidId);
    }

    #[test]
    fn app_data_lookup() {
        let stanza = DataMessageStanza {
            app_data: vec![AppData::new("a", "one"), AppData::new("t", "two")],
            ..DataMessageStanza::default()
        };
        assert_eq!(stanza.app_data_value("t"), Some("two"));
        assert_eq!(stanza.app_data_value("missing"), None);
    }

    #[test]
    fn data_message_known_bytes() {
        let stanza = DataMessageStanza {
            from: "a".to_string(),
            category: "c".to_string(),
            ttl: Some(1),
            ..DataMessageStanza::default()
        };
        // field 3 "a", field 5 "c", field 17 varint 1 (key 0x88 0x01)
        assert_eq!(
            stanza.encode_to_vec(),
            vec![0x1A, 0x01, b'a', 0x2A, 0x01, b'c', 0x88, 0x01, 0x01]
        );
    }
}
