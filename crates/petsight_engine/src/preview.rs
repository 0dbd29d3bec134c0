use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUriError {
    #[error("not a data uri")]
    MissingScheme,
    #[error("data uri is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Builds the inline `data:<mime>;base64,<payload>` form used for previews.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Turns a base64 data URI back into bytes.
pub fn decode_data_uri(data_uri: &str) -> Result<DecodedDataUri, DataUriError> {
    let rest = data_uri
        .trim()
        .strip_prefix("data:")
        .ok_or(DataUriError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingScheme)?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| DataUriError::Payload(err.to_string()))?;
    Ok(DecodedDataUri {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
