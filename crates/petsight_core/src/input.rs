use crate::{ClipboardItem, RawImageInput};

/// Name given to images that arrive through the clipboard.
pub const PASTED_FILE_NAME: &str = "pastedImage.jpg";
/// Declared type of images that arrive through the clipboard, whatever their encoding.
pub const PASTED_MIME_TYPE: &str = "image/jpeg";

/// Picks the first clipboard entry whose type mentions `image`.
///
/// Entries after the first match are ignored.
pub fn first_pasted_image(items: Vec<ClipboardItem>) -> Option<RawImageInput> {
    items
        .into_iter()
        .find(|item| item.mime_type.contains("image"))
        .map(|item| RawImageInput::new(item.bytes, PASTED_MIME_TYPE, PASTED_FILE_NAME))
}

/// Declared MIME type of a file picked from disk, derived from its extension.
///
/// Unknown extensions map to `application/octet-stream`.
pub fn mime_type_for_file_name(file_name: &str) -> &'static str {
    let extension = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return "application/octet-stream",
    };
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jfif" | "pjpeg" | "pjp" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        _ => "application/octet-stream",
    }
}
