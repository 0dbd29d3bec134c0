use crate::{CompressionConfig, RawImageInput, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a blocking notice to the user.
    Alert(Notice),
    CompressImage {
        upload_id: UploadId,
        input: RawImageInput,
        config: CompressionConfig,
    },
    /// Upload the image behind `data_uri` to the analysis endpoint.
    SubmitImage { upload_id: UploadId, data_uri: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidImageType,
    CompressionFailed,
    Busy,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::InvalidImageType => "Please select an image file (png, jpeg, webp).",
            Notice::CompressionFailed => "Cannot compress the image.",
            Notice::Busy => "Still working on the previous image, please wait.",
        }
    }
}
