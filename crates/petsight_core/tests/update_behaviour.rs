use std::sync::Once;

use petsight_core::{
    update, AppState, ClipboardItem, CompressedImage, CompressionConfig, Effect, Msg, Notice,
    Phase, RawImageInput, SubmissionResult, IDLE_PLACEHOLDER,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pipeline_logging::initialize_for_tests);
}

fn jpeg_input() -> RawImageInput {
    RawImageInput::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg", "cat.jpg")
}

fn compressed(data_uri: &str) -> CompressedImage {
    CompressedImage {
        mime_type: "image/jpeg".to_string(),
        width: 1920,
        height: 1080,
        byte_len: 4,
        data_uri: data_uri.to_string(),
    }
}

/// Runs a file selection and a successful compression, leaving the state in `Submitting`.
fn select_and_compress(state: AppState, data_uri: &str) -> (AppState, u64, Vec<Effect>) {
    let (state, effects) = update(state, Msg::FileSelected(Some(jpeg_input())));
    let upload_id = match effects.as_slice() {
        [Effect::CompressImage { upload_id, .. }] => *upload_id,
        other => panic!("expected a single CompressImage effect, got {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::CompressionFinished {
            upload_id,
            result: Ok(compressed(data_uri)),
        },
    );
    (state, upload_id, effects)
}

#[test]
fn accepted_file_starts_compression_with_fixed_config() {
    init_logging();
    let (mut next, effects) = update(AppState::new(), Msg::FileSelected(Some(jpeg_input())));

    assert_eq!(next.phase(), &Phase::Compressing { upload_id: 1 });
    assert_eq!(
        effects,
        vec![Effect::CompressImage {
            upload_id: 1,
            input: jpeg_input(),
            config: CompressionConfig {
                max_size_bytes: 1024 * 1024,
                max_width_or_height: 1920,
                use_background_thread: true,
            },
        }]
    );
    assert!(next.consume_dirty());
}

#[test]
fn gif_is_rejected_with_alert_and_no_preview() {
    init_logging();
    let gif = RawImageInput::new(b"GIF89a".to_vec(), "image/gif", "cat.gif");

    let (next, effects) = update(AppState::new(), Msg::FileSelected(Some(gif)));

    assert_eq!(effects, vec![Effect::Alert(Notice::InvalidImageType)]);
    assert_eq!(next.phase(), &Phase::Idle);
    assert_eq!(next.preview(), None);
    assert_eq!(next.view().status_text, IDLE_PLACEHOLDER);
}

#[test]
fn empty_file_selection_is_rejected() {
    init_logging();
    let (next, effects) = update(AppState::new(), Msg::FileSelected(None));

    assert_eq!(effects, vec![Effect::Alert(Notice::InvalidImageType)]);
    assert_eq!(next.phase(), &Phase::Idle);
}

#[test]
fn rejection_clears_previous_preview() {
    init_logging();
    let (state, upload_id, _) = select_and_compress(AppState::new(), "data:image/jpeg;base64,AAAA");
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            upload_id,
            result: SubmissionResult::Success {
                result: "purr".to_string(),
            },
        },
    );
    assert!(state.preview().is_some());

    let webm = RawImageInput::new(vec![1], "video/webm", "cat.webm");
    let (mut next, effects) = update(state, Msg::FileSelected(Some(webm)));

    assert_eq!(effects, vec![Effect::Alert(Notice::InvalidImageType)]);
    assert_eq!(next.preview(), None);
    assert!(next.consume_dirty());
}

#[test]
fn paste_uses_first_image_item_as_jpeg() {
    init_logging();
    let items = vec![
        ClipboardItem::new("text/plain", b"a cat".to_vec()),
        ClipboardItem::new("image/png", vec![9, 9, 9]),
        ClipboardItem::new("image/png", vec![7, 7, 7]),
    ];

    let (next, effects) = update(AppState::new(), Msg::Pasted(items));

    assert_eq!(next.phase(), &Phase::Compressing { upload_id: 1 });
    assert_eq!(
        effects,
        vec![Effect::CompressImage {
            upload_id: 1,
            input: RawImageInput::new(vec![9, 9, 9], "image/jpeg", "pastedImage.jpg"),
            config: CompressionConfig::FIXED,
        }]
    );
}

#[test]
fn paste_without_image_is_ignored() {
    init_logging();
    let state = AppState::new();
    let items = vec![ClipboardItem::new("text/plain", b"no cat here".to_vec())];

    let (next, effects) = update(state.clone(), Msg::Pasted(items));

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn compression_success_sets_preview_and_submits_once() {
    init_logging();
    let data_uri = "data:image/jpeg;base64,/9j/4A==";
    let (state, upload_id, effects) = select_and_compress(AppState::new(), data_uri);

    assert_eq!(
        effects,
        vec![Effect::SubmitImage {
            upload_id,
            data_uri: data_uri.to_string(),
        }]
    );
    assert_eq!(state.phase(), &Phase::Submitting { upload_id });
    assert_eq!(state.preview(), Some(data_uri));
}

#[test]
fn compression_failure_alerts_and_returns_to_idle() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(Some(jpeg_input())));

    let (next, effects) = update(
        state,
        Msg::CompressionFinished {
            upload_id: 1,
            result: Err("corrupt jpeg".to_string()),
        },
    );

    assert_eq!(effects, vec![Effect::Alert(Notice::CompressionFailed)]);
    assert_eq!(next.phase(), &Phase::Idle);
    assert!(next.view().input_enabled);
    assert_eq!(next.view().status_text, IDLE_PLACEHOLDER);
}

/// Finishes the submission of `upload_id` with `result`.
fn finish(state: AppState, upload_id: u64, result: SubmissionResult) -> AppState {
    update(state, Msg::SubmissionFinished { upload_id, result }).0
}

#[test]
fn compression_failure_keeps_previous_verdict() {
    init_logging();
    let (state, first, _) = select_and_compress(AppState::new(), "data:image/jpeg;base64,AA==");
    let state = finish(
        state,
        first,
        SubmissionResult::Success {
            result: "cat wants food".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::FileSelected(Some(jpeg_input())));
    let second = match effects.as_slice() {
        [Effect::CompressImage { upload_id, .. }] => *upload_id,
        other => panic!("expected a single CompressImage effect, got {other:?}"),
    };
    let (next, effects) = update(
        state,
        Msg::CompressionFinished {
            upload_id: second,
            result: Err("boom".to_string()),
        },
    );

    assert_eq!(effects, vec![Effect::Alert(Notice::CompressionFailed)]);
    assert_eq!(
        next.phase(),
        &Phase::Succeeded {
            result: "cat wants food".to_string()
        }
    );
    assert_eq!(next.view().status_text, "cat wants food");
    assert!(next.view().input_enabled);
}

#[test]
fn compression_failure_keeps_previous_error() {
    init_logging();
    let (state, first, _) = select_and_compress(AppState::new(), "data:image/jpeg;base64,AA==");
    let state = finish(
        state,
        first,
        SubmissionResult::Failure {
            error: "rate limited".to_string(),
        },
    );
    let (state, _) = update(state, Msg::FileSelected(Some(jpeg_input())));

    let (next, _) = update(
        state,
        Msg::CompressionFinished {
            upload_id: first + 1,
            result: Err("boom".to_string()),
        },
    );

    assert_eq!(
        next.view().status_text,
        "Something went wrong, please try again. Error: rate limited"
    );
}

#[test]
fn successful_analysis_shows_server_result() {
    init_logging();
    let (state, upload_id, _) = select_and_compress(AppState::new(), "data:image/jpeg;base64,AA==");

    let (next, effects) = update(
        state,
        Msg::SubmissionFinished {
            upload_id,
            result: SubmissionResult::Success {
                result: "cat wants food".to_string(),
            },
        },
    );

    assert!(effects.is_empty());
    assert_eq!(next.view().status_text, "cat wants food");
    assert!(!next.phase().is_busy());
}

#[test]
fn server_error_shows_error_template_and_clears_busy() {
    init_logging();
    let (state, upload_id, _) = select_and_compress(AppState::new(), "data:image/jpeg;base64,AA==");

    let (next, _) = update(
        state,
        Msg::SubmissionFinished {
            upload_id,
            result: SubmissionResult::Failure {
                error: "rate limited".to_string(),
            },
        },
    );

    let view = next.view();
    assert_eq!(
        view.status_text,
        "Something went wrong, please try again. Error: rate limited"
    );
    assert!(view.input_enabled);
    assert_eq!(view.button_label, "Analyze");
}

#[test]
fn new_input_while_busy_is_refused() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(Some(jpeg_input())));

    let (next, effects) = update(state.clone(), Msg::FileSelected(Some(jpeg_input())));
    assert_eq!(effects, vec![Effect::Alert(Notice::Busy)]);
    assert_eq!(next, state);

    let items = vec![ClipboardItem::new("image/png", vec![1])];
    let (next, effects) = update(state.clone(), Msg::Pasted(items));
    assert_eq!(effects, vec![Effect::Alert(Notice::Busy)]);
    assert_eq!(next, state);
}

#[test]
fn stale_results_do_not_overwrite_newer_upload() {
    init_logging();
    let (state, first, _) = select_and_compress(AppState::new(), "data:image/jpeg;base64,AA==");
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            upload_id: first,
            result: SubmissionResult::Success {
                result: "first".to_string(),
            },
        },
    );
    let (state, second, _) = select_and_compress(state, "data:image/jpeg;base64,BB==");
    assert_ne!(first, second);

    // A duplicate answer for the first upload arrives late.
    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            upload_id: first,
            result: SubmissionResult::Failure {
                error: "late".to_string(),
            },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), &Phase::Submitting { upload_id: second });

    let (state, effects) = update(
        state,
        Msg::CompressionFinished {
            upload_id: first,
            result: Ok(compressed("data:image/jpeg;base64,CC==")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.preview(), Some("data:image/jpeg;base64,BB=="));
}
