//! MCS message records and the tag registry.
//!
//! Payloads are proto2 records from `mcs.proto`. The registry maps a frame
//! tag to exactly one record type and rejects everything else.

pub mod error;
pub mod messages;
pub mod registry;

pub use error::{ProtoError, Result};
pub use messages::{
    AppData, ApplicationMessage, AuthService, DataMessageStanza, ErrorInfo, Extension, HeartbeatAck, HeartbeatConfig,
    HeartbeatPing, HeartbeatStat, IqStanza, IqType, LoginRequest, LoginResponse, Setting,
    StreamErrorStanza, TaggedMessage,
};
pub use registry::McsMessage;
