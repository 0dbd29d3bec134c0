use pipeline_logging::{pipeline_debug, pipeline_info, pipeline_warn};

use crate::{
    first_pasted_image, validate_input, AppState, CompressedImage, CompressionConfig, Effect,
    Msg, Notice, Phase, RawImageInput, SubmissionResult, UploadId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(input) => begin_upload(&mut state, input),
        Msg::Pasted(items) => match first_pasted_image(items) {
            Some(input) => begin_upload(&mut state, Some(input)),
            None => {
                pipeline_debug!("paste carried no image item");
                Vec::new()
            }
        },
        Msg::CompressionFinished { upload_id, result } => {
            if state.phase() != &(Phase::Compressing { upload_id }) {
                pipeline_debug!("dropping stale compression result for upload {}", upload_id);
                return (state, Vec::new());
            }
            finish_compression(&mut state, upload_id, result)
        }
        Msg::SubmissionFinished { upload_id, result } => {
            if state.phase() != &(Phase::Submitting { upload_id }) {
                pipeline_debug!("dropping stale submission result for upload {}", upload_id);
                return (state, Vec::new());
            }
            match &result {
                SubmissionResult::Success { .. } => pipeline_info!("upload {} analyzed", upload_id),
                SubmissionResult::Failure { error } => {
                    pipeline_warn!("upload {} failed: {}", upload_id, error)
                }
            }
            state.finish_submission(result);
            Vec::new()
        }
    };

    (state, effects)
}

fn begin_upload(state: &mut AppState, input: Option<RawImageInput>) -> Vec<Effect> {
    if let Some(upload_id) = state.phase().active_upload() {
        pipeline_info!("ignoring new image while upload {} is in flight", upload_id);
        return vec![Effect::Alert(Notice::Busy)];
    }

    let input = match validate_input(input) {
        Ok(input) => input,
        Err(err) => {
            pipeline_info!("rejected input: {}", err);
            state.clear_preview();
            return vec![Effect::Alert(Notice::InvalidImageType)];
        }
    };

    let upload_id = state.start_compressing();
    pipeline_info!(
        "upload {} accepted: {} ({}, {} bytes)",
        upload_id,
        input.file_name,
        input.mime_type,
        input.bytes.len()
    );
    vec![Effect::CompressImage {
        upload_id,
        input,
        config: CompressionConfig::FIXED,
    }]
}

fn finish_compression(
    state: &mut AppState,
    upload_id: UploadId,
    result: Result<CompressedImage, String>,
) -> Vec<Effect> {
    match result {
        Ok(image) => {
            pipeline_info!(
                "upload {} compressed to {}x{} ({} bytes)",
                upload_id,
                image.width,
                image.height,
                image.byte_len
            );
            let data_uri = image.data_uri;
            state.start_submitting(upload_id, data_uri.clone());
            vec![Effect::SubmitImage {
                upload_id,
                data_uri,
            }]
        }
        Err(err) => {
            pipeline_warn!("upload {} could not be compressed: {}", upload_id, err);
            state.abort_upload();
            vec![Effect::Alert(Notice::CompressionFailed)]
        }
    }
}
