//! Image URL rewriting.
//!
//! The API may return root-relative media paths; they are rewritten to
//! absolute URLs before recipes are handed to the view layer.

/// Rewrites a root-relative media path to an absolute URL.
///
/// Already-absolute URLs pass through unchanged.
pub fn absolutize(origin: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_gets_origin_prefix() {
        assert_eq!(
            absolutize("https://api.example.com", "/media/x.jpg"),
            "https://api.example.com/media/x.jpg"
        );
    }

    #[test]
    fn trailing_slash_on_origin_is_tolerated() {
        assert_eq!(
            absolutize("https://api.example.com/", "/media/x.jpg"),
            "https://api.example.com/media/x.jpg"
        );
    }

    #[test]
    fn absolute_url_passes_through() {
        assert_eq!(
            absolutize("https://api.example.com", "http://cdn.example.com/x.jpg"),
            "http://cdn.example.com/x.jpg"
        );
    }
}
