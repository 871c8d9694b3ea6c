//! MCS push-notification protocol client.
//!
//! mcsprims speaks the mobile connection server protocol: a version byte,
//! then tagged, varint-length-prefixed protobuf records over one long-lived
//! stream.
//!
//! # Crate Structure
//!
//! - [`transport`] - Byte-stream transport and connectors
//! - [`frame`] - Version byte, tag and varint length framing
//! - [`proto`] - Message records and the tag registry
//! - [`session`] - Handshake state machine, connection engine, account binder (behind `session` feature)

/// Re-export transport types.
pub mod transport {
    pub use mcsprims_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use mcsprims_frame::*;
}

/// Re-export message records.
pub mod proto {
    pub use mcsprims_proto::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use mcsprims_session::*;
}
