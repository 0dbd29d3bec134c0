#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file; `None` when the picker came back empty.
    FileSelected(Option<crate::RawImageInput>),
    /// A paste event reached the window.
    Pasted(Vec<crate::ClipboardItem>),
    /// Engine finished compressing (and encoding the preview of) an upload.
    CompressionFinished {
        upload_id: crate::UploadId,
        result: Result<crate::CompressedImage, String>,
    },
    /// Engine got an answer (or gave up) for an upload.
    SubmissionFinished {
        upload_id: crate::UploadId,
        result: crate::SubmissionResult,
    },
}
