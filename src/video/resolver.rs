use regex::Regex;

use crate::error::{AppError, Result};

/// Extract the canonical video id from a user-supplied URL. Pure string
/// parsing; the short `youtu.be` form wins over the `v=` query parameter
/// when both could apply.
pub fn resolve(url: &str) -> Result<String> {
    let short_re = Regex::new(r"^https://youtu\.be/([^?&]+)").expect("valid regex");
    let long_re = Regex::new(r"v=([^&]+)").expect("valid regex");

    if let Some(caps) = short_re.captures(url) {
        return Ok(caps[1].to_string());
    }
    if let Some(caps) = long_re.captures(url) {
        return Ok(caps[1].to_string());
    }

    Err(AppError::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_short_form() {
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn short_form_id_stops_at_query() {
        assert_eq!(resolve("https://youtu.be/abc123?t=30").unwrap(), "abc123");
        assert_eq!(resolve("https://youtu.be/abc123&feature=x").unwrap(), "abc123");
    }

    #[test]
    fn resolves_long_form() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn long_form_id_stops_at_ampersand() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=abc123&list=PLx").unwrap(),
            "abc123"
        );
    }

    #[test]
    fn short_form_takes_precedence() {
        assert_eq!(resolve("https://youtu.be/short?v=long").unwrap(), "short");
    }

    #[test]
    fn rejects_unrecognized_urls() {
        let err = resolve("https://example.com/watch").unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }
}
