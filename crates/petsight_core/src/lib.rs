//! PetSight core: pure upload state machine and result projection.
mod effect;
mod input;
mod msg;
mod state;
mod types;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, Notice};
pub use input::{first_pasted_image, mime_type_for_file_name, PASTED_FILE_NAME, PASTED_MIME_TYPE};
pub use msg::Msg;
pub use state::{AppState, Phase};
pub use types::{
    ClipboardItem, CompressedImage, CompressionConfig, RawImageInput, SubmissionResult, UploadId,
};
pub use update::update;
pub use validate::{validate_input, ValidationError, ACCEPTED_MIME_TYPES};
pub use view_model::{
    AppViewModel, ANALYZE_LABEL, COMPRESSING_CAPTION, COMPRESSING_TEXT, ERROR_PREFIX,
    IDLE_PLACEHOLDER, SUBMITTING_TEXT,
};
