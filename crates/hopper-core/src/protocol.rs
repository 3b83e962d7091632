use crate::render::Frame;

/// Maximum encoded frame size in bytes.
pub const MAX_FRAME_SIZE: usize = 4 * 1024;

#[derive(Debug)]
pub enum ProtocolError {
    EmptyMessage,
    PayloadTooLarge(usize),
    SerializeError(String),
    DeserializeError(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "empty message"),
            Self::PayloadTooLarge(size) => {
                write!(f, "payload too large: {size} bytes (max {MAX_FRAME_SIZE})")
            },
            Self::SerializeError(e) => write!(f, "serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode a frame as MessagePack for a render collaborator.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ProtocolError> {
    let bytes =
        rmp_serde::to_vec(frame).map_err(|e| ProtocolError::SerializeError(e.to_string()))?;
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::PayloadTooLarge(bytes.len()));
    }
    Ok(bytes)
}

pub fn decode_frame(data: &[u8]) -> Result<Frame, ProtocolError> {
    if data.is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    if data.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::PayloadTooLarge(data.len()));
    }
    rmp_serde::from_slice(data).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}
