use petsight_core::AppViewModel;
use petsight_engine::decode_data_uri;

/// Which part of the screen a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    Preview,
    Status,
    Button,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConsoleLine {
    pub region: Region,
    pub text: String,
}

impl ConsoleLine {
    fn new(region: Region, text: impl Into<String>) -> Self {
        Self {
            region,
            text: text.into(),
        }
    }
}

pub(crate) fn render(view: &AppViewModel) -> Vec<ConsoleLine> {
    let preview = match (&view.preview_caption, &view.preview) {
        (Some(caption), _) => caption.clone(),
        (None, Some(data_uri)) => describe_preview(data_uri),
        (None, None) => "[no image]".to_string(),
    };
    let button = if view.input_enabled {
        format!("[ {} ]", view.button_label)
    } else {
        format!("[ {} ] (busy)", view.button_label)
    };

    vec![
        ConsoleLine::new(Region::Preview, preview),
        ConsoleLine::new(Region::Status, view.status_text.clone()),
        ConsoleLine::new(Region::Button, button),
    ]
}

/// A terminal cannot show the picture, so summarize it.
fn describe_preview(data_uri: &str) -> String {
    match decode_data_uri(data_uri) {
        Ok(decoded) => format!(
            "[preview {}, {}]",
            decoded.mime_type,
            format_size(decoded.bytes.len() as u64)
        ),
        Err(_) => "[preview]".to_string(),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
