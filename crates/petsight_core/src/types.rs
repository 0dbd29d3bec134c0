use std::fmt;

/// Identifies one pipeline run, from acquisition to result.
pub type UploadId = u64;

/// An image as handed over by the file picker or the clipboard.
#[derive(Clone, PartialEq, Eq)]
pub struct RawImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl RawImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }
}

// Image payloads are large; keep them out of logs and assertion output.
impl fmt::Debug for RawImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawImageInput")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// One entry of a paste event.
#[derive(Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl fmt::Debug for ClipboardItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardItem")
            .field("mime_type", &self.mime_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Size and dimension ceiling applied to every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Target upper bound of the encoded output.
    pub max_size_bytes: u64,
    /// Upper bound of the longer image edge, in pixels.
    pub max_width_or_height: u32,
    /// Run the encoder off the thread that drives the pipeline.
    pub use_background_thread: bool,
}

impl CompressionConfig {
    /// 1 MB, 1920 px on the long edge, background thread.
    pub const FIXED: Self = Self {
        max_size_bytes: 1024 * 1024,
        max_width_or_height: 1920,
        use_background_thread: true,
    };

    pub fn max_size_mb(&self) -> f64 {
        self.max_size_bytes as f64 / (1024.0 * 1024.0)
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Outcome of compression as seen by the state machine.
#[derive(Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: u64,
    /// Inline `data:` representation used both for the preview and the upload payload.
    pub data_uri: String,
}

impl fmt::Debug for CompressedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedImage")
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("byte_len", &self.byte_len)
            .field("data_uri_len", &self.data_uri.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success { result: String },
    Failure { error: String },
}
