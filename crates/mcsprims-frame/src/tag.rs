use std::fmt;

/// Message tags defined by the MCS protocol.
///
/// Only a subset is receivable by this client; the full table exists so
/// diagnostics can name whatever the peer sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum McsTag {
    HeartbeatPing = 0,
    HeartbeatAck = 1,
    LoginRequest = 2,
    LoginResponse = 3,
    Close = 4,
    MessageStanza = 5,
    PresenceStanza = 6,
    IqStanza = 7,
    DataMessageStanza = 8,
    BatchPresenceStanza = 9,
    StreamErrorStanza = 10,
    HttpRequest = 11,
    HttpResponse = 12,
    BindAccountRequest = 13,
    BindAccountResponse = 14,
    TalkMetadata = 15,
}

impl McsTag {
    /// Look up a tag by its wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        let tag = match value {
            0 => McsTag::HeartbeatPing,
            1 => McsTag::HeartbeatAck,
            2 => McsTag::LoginRequest,
            3 => McsTag::LoginResponse,
            4 => McsTag::Close,
            5 => McsTag::MessageStanza,
            6 => McsTag::PresenceStanza,
            7 => McsTag::IqStanza,
            8 => McsTag::DataMessageStanza,
            9 => McsTag::BatchPresenceStanza,
            10 => McsTag::StreamErrorStanza,
            11 => McsTag::HttpRequest,
            12 => McsTag::HttpResponse,
            13 => McsTag::BindAccountRequest,
            14 => McsTag::BindAccountResponse,
            15 => McsTag::TalkMetadata,
            _ => return None,
        };
        Some(tag)
    }

    /// Wire value of this tag.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            McsTag::HeartbeatPing => "heartbeat-ping",
            McsTag::HeartbeatAck => "heartbeat-ack",
            McsTag::LoginRequest => "login-request",
            McsTag::LoginResponse => "login-response",
            McsTag::Close => "close",
            McsTag::MessageStanza => "message-stanza",
            McsTag::PresenceStanza => "presence-stanza",
            McsTag::IqStanza => "iq-stanza",
            McsTag::DataMessageStanza => "data-message-stanza",
            McsTag::BatchPresenceStanza => "batch-presence-stanza",
            McsTag::StreamErrorStanza => "stream-error-stanza",
            McsTag::HttpRequest => "http-request",
            McsTag::HttpResponse => "http-response",
            McsTag::BindAccountRequest => "bind-account-request",
            McsTag::BindAccountResponse => "bind-account-response",
            McsTag::TalkMetadata => "talk-metadata",
        }
    }
}

impl fmt::Display for McsTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}

/// Name a raw tag value, falling back to `unknown`.
pub fn tag_name(value: u8) -> &'static str {
    McsTag::from_u8(value).map_or("unknown", McsTag::name)
}
