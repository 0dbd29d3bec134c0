use crate::RawImageInput;

/// The only MIME types the pipeline will compress and upload.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no file selected")]
    Missing,
    #[error("unsupported image type {mime_type:?}")]
    UnsupportedType { mime_type: String },
}

/// Accepts an input only if its declared type is on the allow-list.
pub fn validate_input(input: Option<RawImageInput>) -> Result<RawImageInput, ValidationError> {
    let input = input.ok_or(ValidationError::Missing)?;
    if ACCEPTED_MIME_TYPES.contains(&input.mime_type.as_str()) {
        Ok(input)
    } else {
        Err(ValidationError::UnsupportedType {
            mime_type: input.mime_type,
        })
    }
}
