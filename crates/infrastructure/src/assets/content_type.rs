use std::path::Path;

/// Content type by file extension. Unknown extensions are served as plain text.
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "text/plain; charset=utf-8",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for("/index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("/style.CSS"), "text/css");
        assert_eq!(content_type_for("/app.js"), "application/javascript");
        assert_eq!(content_type_for("/logo.png"), "image/png");
        assert_eq!(content_type_for("/photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("/anim.gif"), "image/gif");
    }

    #[test]
    fn test_unknown_extension_is_plain_text() {
        assert_eq!(content_type_for("/notes.md"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("/README"), "text/plain; charset=utf-8");
    }
}
