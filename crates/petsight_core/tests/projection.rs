use petsight_core::{
    update, AppState, CompressedImage, Effect, Msg, RawImageInput, SubmissionResult,
    COMPRESSING_CAPTION, COMPRESSING_TEXT, IDLE_PLACEHOLDER, SUBMITTING_TEXT,
};

fn start(state: AppState) -> (AppState, u64) {
    let input = RawImageInput::new(vec![1, 2, 3], "image/png", "cat.png");
    let (state, effects) = update(state, Msg::FileSelected(Some(input)));
    let upload_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::CompressImage { upload_id, .. } => Some(*upload_id),
            _ => None,
        })
        .expect("compress effect");
    (state, upload_id)
}

fn compressed(state: AppState, upload_id: u64, data_uri: &str) -> AppState {
    let (state, _) = update(
        state,
        Msg::CompressionFinished {
            upload_id,
            result: Ok(CompressedImage {
                mime_type: "image/jpeg".to_string(),
                width: 10,
                height: 10,
                byte_len: 3,
                data_uri: data_uri.to_string(),
            }),
        },
    );
    state
}

#[test]
fn idle_shows_placeholder() {
    let view = AppState::new().view();
    assert_eq!(view.status_text, IDLE_PLACEHOLDER);
    assert_eq!(view.preview, None);
    assert_eq!(view.preview_caption, None);
    assert_eq!(view.button_label, "Analyze");
    assert!(view.input_enabled);
}

#[test]
fn compressing_hides_preview_and_disables_input() {
    let (state, upload_id) = start(AppState::new());
    let state = compressed(state, upload_id, "data:image/jpeg;base64,AA==");
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            upload_id,
            result: SubmissionResult::Success {
                result: "meow".to_string(),
            },
        },
    );
    assert_eq!(state.view().preview.as_deref(), Some("data:image/jpeg;base64,AA=="));

    let (state, _) = start(state);
    let view = state.view();
    assert_eq!(view.status_text, COMPRESSING_TEXT);
    assert_eq!(view.preview, None);
    assert_eq!(view.preview_caption.as_deref(), Some(COMPRESSING_CAPTION));
    assert_eq!(view.button_label, "Scanning...");
    assert!(!view.input_enabled);
}

#[test]
fn submitting_shows_preview_and_analyzing_text() {
    let (state, upload_id) = start(AppState::new());
    let state = compressed(state, upload_id, "data:image/jpeg;base64,AA==");

    let view = state.view();
    assert_eq!(view.status_text, SUBMITTING_TEXT);
    assert_eq!(view.preview.as_deref(), Some("data:image/jpeg;base64,AA=="));
    assert_eq!(view.button_label, "Analyzing...");
    assert!(!view.input_enabled);
}

#[test]
fn empty_server_strings_fall_back_to_placeholder() {
    let (state, upload_id) = start(AppState::new());
    let state = compressed(state, upload_id, "data:image/jpeg;base64,AA==");
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            upload_id,
            result: SubmissionResult::Failure {
                error: String::new(),
            },
        },
    );
    assert_eq!(state.view().status_text, IDLE_PLACEHOLDER);

    let (state, upload_id) = start(state);
    let state = compressed(state, upload_id, "data:image/jpeg;base64,AA==");
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            upload_id,
            result: SubmissionResult::Success {
                result: String::new(),
            },
        },
    );
    assert_eq!(state.view().status_text, IDLE_PLACEHOLDER);
}
