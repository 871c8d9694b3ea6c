use mcsprims_frame::{Frame, McsTag};
use prost::Message;

use crate::error::{ProtoError, Result};
use crate::messages::{
    DataMessageStanza, HeartbeatAck, HeartbeatPing, IqStanza, LoginRequest, LoginResponse,
    StreamErrorStanza, TaggedMessage,
};

/// Every record that can appear in an MCS frame handled by this client.
#[derive(Debug, Clone, PartialEq)]
pub enum McsMessage {
    HeartbeatPing(HeartbeatPing),
    HeartbeatAck(HeartbeatAck),
    LoginRequest(LoginRequest),
    LoginResponse(LoginResponse),
    IqStanza(IqStanza),
    DataMessageStanza(DataMessageStanza),
    StreamErrorStanza(StreamErrorStanza),
}

impl McsMessage {
    /// Empty record for an incoming frame tag.
    ///
    /// Login requests are send-only; any other tag outside the receivable
    /// set is rejected rather than mapped to a default.
    pub fn variant_for(tag: u8) -> Result<Self> {
        let known = McsTag::from_u8(tag).ok_or(ProtoError::UnknownTag(tag))?;
        let message = match known {
            McsTag::HeartbeatPing => McsMessage::HeartbeatPing(HeartbeatPing::default()),
            McsTag::HeartbeatAck => McsMessage::HeartbeatAck(HeartbeatAck::default()),
            McsTag::LoginResponse => McsMessage::LoginResponse(LoginResponse::default()),
            McsTag::IqStanza => McsMessage::IqStanza(IqStanza::default()),
            McsTag::DataMessageStanza => {
                McsMessage::DataMessageStanza(DataMessageStanza::default())
            }
            McsTag::StreamErrorStanza => {
                McsMessage::StreamErrorStanza(StreamErrorStanza::default())
            }
            other => return Err(ProtoError::UnexpectedTag(other)),
        };
        Ok(message)
    }

    /// Decode an incoming frame into its record.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(frame.tag, &frame.payload)
    }

    /// Decode `payload` as the record selected by `tag`.
    ///
    /// Parsing is confined to `payload` and consumes all of it: a field
    /// running past the end, or a stray partial field after the record, is a
    /// decode error.
    pub fn decode(tag: u8, payload: &[u8]) -> Result<Self> {
        let mut message = Self::variant_for(tag)?;
        let mut buf = payload;
        message.merge(&mut buf)?;
        Ok(message)
    }

    fn merge(&mut self, buf: &mut &[u8]) -> Result<()> {
        let tag = self.tag();
        let result = match self {
            McsMessage::HeartbeatPing(m) => m.merge(buf),
            McsMessage::HeartbeatAck(m) => m.merge(buf),
            McsMessage::LoginRequest(m) => m.merge(buf),
            McsMessage::LoginResponse(m) => m.merge(buf),
            McsMessage::IqStanza(m) => m.merge(buf),
            McsMessage::DataMessageStanza(m) => m.merge(buf),
            McsMessage::StreamErrorStanza(m) => m.merge(buf),
        };
        result.map_err(|source| ProtoError::Decode { tag, source })
    }

    /// Tag this record travels under.
    pub fn tag(&self) -> McsTag {
        match self {
            McsMessage::HeartbeatPing(_) => HeartbeatPing::TAG,
            McsMessage::HeartbeatAck(_) => HeartbeatAck::TAG,
            McsMessage::LoginRequest(_) => LoginRequest::TAG,
            McsMessage::LoginResponse(_) => LoginResponse::TAG,
            McsMessage::IqStanza(_) => IqStanza::TAG,
            McsMessage::DataMessageStanza(_) => DataMessageStanza::TAG,
            McsMessage::StreamErrorStanza(_) => StreamErrorStanza::TAG,
        }
    }

    /// Serialize the record payload (without frame header).
    pub fn encode_to_vec(&self) -> Vec<u8> {
        match self {
            McsMessage::HeartbeatPing(m) => m.encode_to_vec(),
            McsMessage::HeartbeatAck(m) => m.encode_to_vec(),
            McsMessage::LoginRequest(m) => m.encode_to_vec(),
            McsMessage::LoginResponse(m) => m.encode_to_vec(),
            McsMessage::IqStanza(m) => m.encode_to_vec(),
            McsMessage::DataMessageStanza(m) => m.encode_to_vec(),
            McsMessage::StreamErrorStanza(m) => m.encode_to_vec(),
        }
    }

    /// Build the outgoing frame for this record.
    pub fn to_frame(&self) -> Frame {
        Frame::new(self.tag().as_u8(), self.encode_to_vec())
    }
}

macro_rules! impl_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for McsMessage {
                fn from(message: $ty) -> Self {
                    McsMessage::$ty(message)
                }
            }
        )*
    };
}

impl_from!(
    HeartbeatPing,
    HeartbeatAck,
    LoginRequest,
    LoginResponse,
    IqStanza,
    DataMessageStanza,
    StreamErrorStanza,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{AppData, ErrorInfo, HeartbeatConfig, IqType, Setting};

    fn roundtrip(message: McsMessage) {
        let frame = message.to_frame();
        let decoded = McsMessage::from_frame(&frame).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn receivable_variants_roundtrip() {
        roundtrip(
            HeartbeatPing {
                stream_id: Some(4),
                last_stream_id_received: Some(3),
                status: Some(0),
            }
            .into(),
        );
        roundtrip(HeartbeatAck::default().into());
        roundtrip(
            LoginResponse {
                id: "login-1".to_string(),
                jid: Some("user@mcs.android.com".to_string()),
                error: Some(ErrorInfo {
                    code: 7,
                    message: Some("nope".to_string()),
                    ..ErrorInfo::default()
                }),
                setting: vec![Setting {
                    name: "hbping".to_string(),
                    value: "60".to_string(),
                }],
                stream_id: Some(1),
                last_stream_id_received: Some(1),
                heartbeat_config: Some(HeartbeatConfig {
                    interval_ms: Some(60_000),
                    ..HeartbeatConfig::default()
                }),
                server_timestamp: Some(1_700_000_000_000),
            }
            .into(),
        );
        roundtrip(
            IqStanza {
                r#type: IqType::Set as i32,
                id: "iq-1".to_string(),
                from: Some("mcs.android.com".to_string()),
                ..IqStanza::default()
            }
            .into(),
        );
        roundtrip(
            DataMessageStanza {
                id: Some("1700000000-0".to_string()),
                from: "google.com".to_string(),
                category: "com.example".to_string(),
                app_data: vec![AppData::new("k", "v")],
                raw_data: Some(vec![0, 1, 2, 255]),
                ttl: Some(86_400),
                ..DataMessageStanza::default()
            }
            .into(),
        );
        roundtrip(
            StreamErrorStanza {
                r#type: "conflict".to_string(),
                text: Some("replaced".to_string()),
            }
            .into(),
        );
    }

    #[test]
    fn tag_mapping_is_consistent() {
        for tag in [0u8, 1, 3, 7, 8, 10] {
            let message = McsMessage::variant_for(tag).unwrap();
            assert_eq!(message.tag().as_u8(), tag);
        }
    }

    #[test]
    fn login_request_is_send_only() {
        let frame = McsMessage::from(LoginRequest::default()).to_frame();
        assert_eq!(frame.tag, 2);

        let err = McsMessage::from_frame(&frame).unwrap_err();
        assert!(matches!(err, ProtoError::UnexpectedTag(McsTag::LoginRequest)));
    }

    #[test]
    fn protocol_tags_outside_receivable_set_fail() {
        for tag in [4u8, 5, 6, 9, 11, 12, 13, 14, 15] {
            let err = McsMessage::variant_for(tag).unwrap_err();
            assert!(matches!(err, ProtoError::UnexpectedTag(_)), "tag {tag}");
        }
    }

    #[test]
    fn unknown_tags_fail() {
        for tag in [16u8, 99, 255] {
            let err = McsMessage::decode(tag, &[]).unwrap_err();
            assert!(matches!(err, ProtoError::UnknownTag(t) if t == tag));
        }
    }

    #[test]
    fn truncated_payload_is_decode_error() {
        let stanza = DataMessageStanza {
            from: "sender".to_string(),
            category: "cat".to_string(),
            ..DataMessageStanza::default()
        };
        let bytes = McsMessage::from(stanza).encode_to_vec();

        let err = McsMessage::decode(8, &bytes[..bytes.len() - 2]).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::Decode {
                tag: McsTag::DataMessageStanza,
                ..
            }
        ));
    }

    #[test]
    fn payload_padding_is_rejected() {
        // A lone zero byte is field number 0, which no record accepts.
        let err = McsMessage::decode(0, &[0x00]).unwrap_err();
        assert!(matches!(err, ProtoError::Decode { .. }));
    }

    #[test]
    fn partial_field_after_record_is_decode_error() {
        let mut bytes = McsMessage::from(StreamErrorStanza {
            r#type: "conflict".to_string(),
            text: None,
        })
        .encode_to_vec();
        // Header of field 2 with no length byte behind it.
        bytes.push(0x12);

        let err = McsMessage::decode(10, &bytes).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::Decode {
                tag: McsTag::StreamErrorStanza,
                ..
            }
        ));
    }
}
