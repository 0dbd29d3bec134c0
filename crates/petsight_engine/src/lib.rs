//! PetSight engine: compression, preview encoding and upload, run off the UI thread.
mod compress;
mod engine;
mod preview;
mod submit;
mod types;

pub use compress::{fit_within, CompressSettings, Compressor, EncodedImage, JpegCompressor};
pub use engine::{EngineError, EngineHandle};
pub use preview::{decode_data_uri, encode_data_uri, DataUriError, DecodedDataUri};
pub use submit::{
    ChannelProgressSink, ProgressSink, ReqwestSubmitter, SubmitSettings, Submitter,
    DEFAULT_BASE_URL, UPLOAD_PATH,
};
pub use types::{
    CompressError, CompressedImage, EngineEvent, FailureKind, Stage, SubmitError, UploadId,
    UploadProgress,
};
