use mcsprims_frame::McsTag;

/// Errors raised while mapping frames to message records.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The tag is not part of the MCS protocol at all.
    #[error("unknown message tag {0}")]
    UnknownTag(u8),

    /// The tag names a message this client never receives.
    #[error("unexpected message tag {0}")]
    UnexpectedTag(McsTag),

    /// The payload did not parse as the record selected by its tag.
    #[error("failed to decode {tag}: {source}")]
    Decode {
        tag: McsTag,
        #[source]
        source: prost::DecodeError,
    },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
