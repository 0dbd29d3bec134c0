use crate::Phase;

/// Shown before anything was uploaded.
pub const IDLE_PLACEHOLDER: &str = "🐱: Where have you been? I've been waiting for you for ages";
/// Shown while the image is being compressed.
pub const COMPRESSING_TEXT: &str = "🐱🐱🐱🐱🐱🐱";
/// Shown while waiting for the analysis.
pub const SUBMITTING_TEXT: &str = "Analyzing...";
/// Prepended to the server's error message.
pub const ERROR_PREFIX: &str = "Something went wrong, please try again. Error";
/// Shown in place of the preview while compressing.
pub const COMPRESSING_CAPTION: &str = "Scanning image...";
pub const ANALYZE_LABEL: &str = "Analyze";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// The single status line under the preview.
    pub status_text: String,
    /// Data URI to display, hidden while compressing.
    pub preview: Option<String>,
    pub preview_caption: Option<String>,
    pub button_label: String,
    /// Whether new files or pastes are accepted right now.
    pub input_enabled: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub(crate) fn project(phase: &Phase, preview: Option<&str>, dirty: bool) -> Self {
        let compressing = matches!(phase, Phase::Compressing { .. });
        let button_label = match phase {
            Phase::Compressing { .. } => "Scanning...",
            Phase::Submitting { .. } => "Analyzing...",
            _ => ANALYZE_LABEL,
        };
        Self {
            status_text: status_text(phase),
            preview: if compressing {
                None
            } else {
                preview.map(ToOwned::to_owned)
            },
            preview_caption: compressing.then(|| COMPRESSING_CAPTION.to_string()),
            button_label: button_label.to_string(),
            input_enabled: !phase.is_busy(),
            dirty,
        }
    }
}

/// Maps the phase to exactly one display string.
///
/// Priority: compressing, submitting, error, result, placeholder.
fn status_text(phase: &Phase) -> String {
    match phase {
        Phase::Compressing { .. } => COMPRESSING_TEXT.to_string(),
        Phase::Submitting { .. } => SUBMITTING_TEXT.to_string(),
        Phase::Failed { error } if !error.is_empty() => format!("{ERROR_PREFIX}: {error}"),
        Phase::Succeeded { result } if !result.is_empty() => result.clone(),
        Phase::Idle | Phase::Failed { .. } | Phase::Succeeded { .. } => {
            IDLE_PLACEHOLDER.to_string()
        }
    }
}
